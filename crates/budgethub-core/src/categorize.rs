//! Keyword-based expense categorization
//!
//! Descriptions are lowercased and checked against ordered keyword groups.
//! The first group with any keyword appearing as a substring wins, so group
//! order matters: "gas bill" is Transport because "gas" is checked first.

use crate::models::Category;

/// Ordered keyword groups. Earlier groups take precedence.
const KEYWORD_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "grocery",
            "supermarket",
            "restaurant",
            "food",
            "cafe",
            "coffee",
            "pizza",
            "mcdonald",
            "burger",
            "starbucks",
        ],
    ),
    (
        Category::Transport,
        &[
            "gas", "fuel", "uber", "lyft", "taxi", "metro", "bus", "train", "parking", "toll",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie",
            "cinema",
            "netflix",
            "spotify",
            "game",
            "concert",
            "theater",
            "entertainment",
        ],
    ),
    (
        Category::Shopping,
        &["amazon", "store", "shop", "mall", "clothing", "shoes", "retail"],
    ),
    (
        Category::Utilities,
        &[
            "electric", "water", "gas bill", "internet", "phone", "utility", "power",
        ],
    ),
    (
        Category::Health,
        &["pharmacy", "hospital", "doctor", "medical", "drug", "health"],
    ),
    (
        Category::Travel,
        &["hotel", "flight", "airline", "travel", "vacation", "trip"],
    ),
    (
        Category::Education,
        &["school", "tuition", "book", "education", "course", "university"],
    ),
    (Category::Rent, &["rent", "lease", "apartment", "housing"]),
];

/// Suggest a category for an expense from its description.
///
/// `amount` is accepted for call-site compatibility but does not affect the
/// result. Never fails; unmatched descriptions are `Other`.
pub fn categorize_transaction(description: &str, _amount: f64) -> Category {
    let text = description.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
