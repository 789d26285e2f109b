//! CSV expense export

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::ExpenseFilter;

/// Header row of exported files
pub const EXPORT_HEADER: [&str; 4] = ["Description", "Amount", "Category", "Date"];

/// Download name for an export made on `date`, e.g. `expenses_20240315.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("expenses_{}.csv", date.format("%Y%m%d"))
}

impl Database {
    /// Export all of an owner's expenses as CSV, newest first
    pub fn export_expenses_csv(&self, owner_id: i64) -> Result<String> {
        let expenses = self.list_expenses(owner_id, &ExpenseFilter::default())?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;
        for expense in &expenses {
            let amount = format!("{:.2}", expense.amount);
            let date = expense.date.to_string();
            writer.write_record([
                expense.description.as_str(),
                amount.as_str(),
                expense.category.as_str(),
                date.as_str(),
            ])?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
    }
}
