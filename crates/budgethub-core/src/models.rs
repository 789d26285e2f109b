//! Domain models for BudgetHub

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of an expense description
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user (what the API returns)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Spending category labels produced by the keyword categorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Rent,
    Utilities,
    Health,
    Travel,
    Education,
    Other,
}

impl Category {
    /// All categories, in the order offered to clients
    pub const ALL: [Category; 10] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Shopping,
        Self::Rent,
        Self::Utilities,
        Self::Health,
        Self::Travel,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Health => "Health",
            Self::Travel => "Travel",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub owner_id: i64,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or replacing an expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

impl NewExpense {
    /// Check the fields a stored expense must satisfy
    pub fn validate(&self) -> Result<()> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::InvalidData("Description is required".into()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::InvalidData(format!(
                "Description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData("Amount must be greater than 0".into()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Category is required".into()));
        }
        Ok(())
    }
}

/// A monthly spending target for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub owner_id: i64,
    pub category: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of setting a budget for a (category, month, year) key
#[derive(Debug, Clone)]
pub enum BudgetUpsert {
    Created(Budget),
    Updated(Budget),
}

impl BudgetUpsert {
    pub fn budget(&self) -> &Budget {
        match self {
            Self::Created(b) | Self::Updated(b) => b,
        }
    }

    pub fn into_budget(self) -> Budget {
        match self {
            Self::Created(b) | Self::Updated(b) => b,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Sum of amounts for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sort orders accepted by the expense list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseSort {
    DateAsc,
    #[default]
    DateDesc,
    AmountAsc,
    AmountDesc,
    Category,
}

impl ExpenseSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
            Self::AmountAsc => "amount_asc",
            Self::AmountDesc => "amount_desc",
            Self::Category => "category",
        }
    }

    /// ORDER BY clause for this sort
    pub(crate) fn order_clause(&self) -> &'static str {
        match self {
            Self::DateAsc => "ORDER BY date ASC, id ASC",
            Self::DateDesc => "ORDER BY date DESC, created_at DESC, id DESC",
            Self::AmountAsc => "ORDER BY amount ASC, id ASC",
            Self::AmountDesc => "ORDER BY amount DESC, id DESC",
            Self::Category => "ORDER BY category ASC, date DESC",
        }
    }
}

impl std::str::FromStr for ExpenseSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            "amount_asc" => Ok(Self::AmountAsc),
            "amount_desc" => Ok(Self::AmountDesc),
            "category" => Ok(Self::Category),
            _ => Err(format!("Unknown sort: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters for listing a user's expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Substring match on description
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower date bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub date_to: Option<NaiveDate>,
    pub sort: ExpenseSort,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(description: &str, amount: f64, category: &str) -> NewExpense {
        NewExpense {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_expense_sort_parse() {
        assert_eq!("amount_desc".parse::<ExpenseSort>().unwrap(), ExpenseSort::AmountDesc);
        assert_eq!(ExpenseSort::default(), ExpenseSort::DateDesc);
        assert!("newest".parse::<ExpenseSort>().is_err());
    }

    #[test]
    fn test_new_expense_validation() {
        assert!(expense("Lunch", 12.5, "Food").validate().is_ok());
        assert!(expense("  ", 12.5, "Food").validate().is_err());
        assert!(expense("Lunch", 0.0, "Food").validate().is_err());
        assert!(expense("Lunch", -3.0, "Food").validate().is_err());
        assert!(expense("Lunch", f64::NAN, "Food").validate().is_err());
        assert!(expense("Lunch", 12.5, "").validate().is_err());
        assert!(expense(&"x".repeat(201), 12.5, "Food").validate().is_err());
    }

    #[test]
    fn test_user_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
