//! SQL implementation of the analytics read interface

use chrono::NaiveDate;
use rusqlite::params;

use super::expenses::{row_to_expense, EXPENSE_COLUMNS};
use super::Database;
use crate::analytics::Ledger;
use crate::error::Result;
use crate::models::{Budget, CategoryTotal, Expense};

/// `strftime` keys for a calendar month, e.g. ("03", "2024")
fn month_key(month: u32, year: i32) -> (String, String) {
    (format!("{:02}", month), year.to_string())
}

impl Ledger for Database {
    fn sum_expenses(
        &self,
        owner_id: i64,
        category: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM expenses
            WHERE owner_id = ?1
              AND date BETWEEN ?2 AND ?3
              AND (?4 IS NULL OR category = ?4)
            "#,
            params![owner_id, from.to_string(), to.to_string(), category],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    fn month_total(
        &self,
        owner_id: i64,
        category: Option<&str>,
        month: u32,
        year: i32,
    ) -> Result<f64> {
        let (month, year) = month_key(month, year);
        let conn = self.conn()?;
        let total = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM expenses
            WHERE owner_id = ?1
              AND strftime('%m', date) = ?2
              AND strftime('%Y', date) = ?3
              AND (?4 IS NULL OR category = ?4)
            "#,
            params![owner_id, month, year, category],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    fn month_category_totals(
        &self,
        owner_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryTotal>> {
        let (month, year) = month_key(month, year);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total FROM expenses
            WHERE owner_id = ?1
              AND strftime('%m', date) = ?2
              AND strftime('%Y', date) = ?3
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )?;

        let totals = stmt
            .query_map(params![owner_id, month, year], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    fn category_totals(&self, owner_id: i64) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total FROM expenses
            WHERE owner_id = ?1
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )?;

        let totals = stmt
            .query_map(params![owner_id], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    fn budget_for(
        &self,
        owner_id: i64,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        self.get_budget(owner_id, category, month, year)
    }

    fn budgets_for_month(&self, owner_id: i64, month: u32, year: i32) -> Result<Vec<Budget>> {
        self.list_budgets(owner_id, month, year)
    }

    fn recent_expenses(&self, owner_id: i64, limit: usize) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE owner_id = ? ORDER BY date DESC, created_at DESC, id DESC LIMIT ?",
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![owner_id, limit as i64], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }
}
