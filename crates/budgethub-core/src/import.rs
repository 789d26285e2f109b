//! CSV expense import
//!
//! Expected columns (header names are case-insensitive, order is free):
//! `description`, `amount`, `category`, `date`. Only `description` and
//! `amount` are required. Bad rows are reported and skipped; good rows are
//! inserted together in a single transaction.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::categorize::categorize_transaction;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::NewExpense;

/// Number of row errors worth showing to a user
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Parsed rows plus the problems found along the way
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub expenses: Vec<NewExpense>,
    pub errors: Vec<String>,
}

/// Outcome of importing a CSV file
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported_count: usize,
    /// The first few row errors
    pub errors: Vec<String>,
    /// Total number of rejected rows
    pub error_count: usize,
    pub message: String,
}

struct Columns {
    description: usize,
    amount: usize,
    category: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        match (find("description"), find("amount")) {
            (Some(description), Some(amount)) => Ok(Self {
                description,
                amount,
                category: find("category"),
                date: find("date"),
            }),
            _ => Err(Error::Import(
                "CSV must have 'description' and 'amount' columns".into(),
            )),
        }
    }
}

/// Parse CSV bytes into expenses.
///
/// Rows with no category are auto-categorized; rows with a missing or
/// unreadable date are dated `today`.
pub fn parse_expenses_csv(data: &[u8], today: NaiveDate) -> Result<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut parsed = ParsedCsv::default();

    // Row 1 is the header
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                parsed.errors.push(format!("Row {}: {}", row, e));
                continue;
            }
        };

        match parse_row(&record, &columns, today) {
            Ok(expense) => parsed.expenses.push(expense),
            Err(msg) => parsed.errors.push(format!("Row {}: {}", row, msg)),
        }
    }

    Ok(parsed)
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    today: NaiveDate,
) -> std::result::Result<NewExpense, String> {
    let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

    let description = field(Some(columns.description));
    let raw_amount = field(Some(columns.amount));
    if description.is_empty() || raw_amount.is_empty() {
        return Err("Missing description or amount".to_string());
    }

    let amount =
        parse_amount(raw_amount).ok_or_else(|| format!("Invalid amount '{}'", raw_amount))?;

    let category = match field(columns.category) {
        "" => categorize_transaction(description, amount).to_string(),
        c => c.to_string(),
    };

    let date = parse_date(field(columns.date)).unwrap_or(today);

    let expense = NewExpense {
        description: description.to_string(),
        amount,
        category,
        date,
    };
    expense.validate().map_err(|e| match e {
        Error::InvalidData(msg) => msg,
        other => other.to_string(),
    })?;

    Ok(expense)
}

/// Parse a date in ISO (`2024-01-15`) or US (`01/15/2024`) form
fn parse_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|a| a.is_finite())
}

impl Database {
    /// Parse CSV bytes and store every valid row for `owner_id`
    pub fn import_expenses_csv(
        &self,
        owner_id: i64,
        data: &[u8],
        today: NaiveDate,
    ) -> Result<ImportSummary> {
        let parsed = parse_expenses_csv(data, today)?;
        let imported_count = self.import_expenses(owner_id, &parsed.expenses)?;

        if !parsed.errors.is_empty() {
            warn!(
                owner_id,
                rejected = parsed.errors.len(),
                "Some CSV rows were rejected"
            );
        }
        info!(owner_id, imported_count, "CSV import complete");

        let error_count = parsed.errors.len();
        let mut errors = parsed.errors;
        errors.truncate(MAX_REPORTED_ERRORS);

        Ok(ImportSummary {
            imported_count,
            errors,
            error_count,
            message: format!("Successfully imported {} expenses", imported_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount(" 12 "), Some(12.0));
        assert_eq!(parse_amount("(5.00)"), Some(-5.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), expected);
        assert_eq!(parse_date("01/15/2024"), expected);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_full_rows() {
        let csv = "description,amount,category,date\n\
                   Groceries,45.20,Food,2024-05-01\n\
                   Netflix,15.99,,2024-05-02\n";
        let parsed = parse_expenses_csv(csv.as_bytes(), today()).unwrap();

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.expenses.len(), 2);
        assert_eq!(parsed.expenses[0].category, "Food");
        assert_eq!(parsed.expenses[1].category, "Entertainment");
        assert_eq!(
            parsed.expenses[1].date,
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }

    #[test]
    fn test_header_case_and_order() {
        let csv = "Date,Amount,Description\n2024-05-03,\"$1,200.00\",Monthly rent\n";
        let parsed = parse_expenses_csv(csv.as_bytes(), today()).unwrap();

        assert_eq!(parsed.expenses.len(), 1);
        assert_eq!(parsed.expenses[0].amount, 1200.0);
        assert_eq!(parsed.expenses[0].category, "Rent");
    }

    #[test]
    fn test_row_errors_reported() {
        let csv = "description,amount,category,date\n\
                   ,10.00,Food,2024-05-01\n\
                   Lunch,,Food,2024-05-01\n\
                   Dinner,ten,Food,2024-05-01\n\
                   Refund,-4.00,Food,2024-05-01\n\
                   Coffee,3.50,Food,2024-05-01\n";
        let parsed = parse_expenses_csv(csv.as_bytes(), today()).unwrap();

        assert_eq!(parsed.expenses.len(), 1);
        assert_eq!(parsed.expenses[0].description, "Coffee");
        assert_eq!(
            parsed.errors,
            vec![
                "Row 2: Missing description or amount".to_string(),
                "Row 3: Missing description or amount".to_string(),
                "Row 4: Invalid amount 'ten'".to_string(),
                "Row 5: Amount must be greater than 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_or_missing_date_uses_today() {
        let csv = "description,amount,date\nTaxi,20,not-a-date\nBus,2.75,\n";
        let parsed = parse_expenses_csv(csv.as_bytes(), today()).unwrap();

        assert_eq!(parsed.expenses.len(), 2);
        assert!(parsed.expenses.iter().all(|e| e.date == today()));
    }

    #[test]
    fn test_missing_required_columns() {
        let csv = "name,value\nLunch,10\n";
        let result = parse_expenses_csv(csv.as_bytes(), today());
        assert!(matches!(result, Err(Error::Import(_))));
    }
}
