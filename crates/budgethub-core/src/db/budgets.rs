//! Budget operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetUpsert};

const BUDGET_COLUMNS: &str = "id, owner_id, category, amount, month, year, created_at, updated_at";

fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;
    Ok(Budget {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

impl Database {
    /// Set the budget for a (category, month, year) key.
    ///
    /// A second call for the same key replaces the amount instead of adding
    /// a row; the result says which happened.
    pub fn upsert_budget(
        &self,
        owner_id: i64,
        category: &str,
        amount: f64,
        month: u32,
        year: i32,
    ) -> Result<BudgetUpsert> {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::InvalidData("Category is required".into()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidData(
                "Budget amount must be greater than 0".into(),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!("Invalid month: {}", month)));
        }

        let existed = self.get_budget(owner_id, category, month, year)?.is_some();

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (owner_id, category, amount, month, year)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(owner_id, category, month, year)
            DO UPDATE SET amount = excluded.amount, updated_at = CURRENT_TIMESTAMP
            "#,
            params![owner_id, category, amount, month, year],
        )?;

        let budget = self
            .get_budget(owner_id, category, month, year)?
            .ok_or_else(|| Error::NotFound(format!("Budget for {}", category)))?;

        info!(owner_id, category, amount, month, year, existed, "Budget set");

        Ok(if existed {
            BudgetUpsert::Updated(budget)
        } else {
            BudgetUpsert::Created(budget)
        })
    }

    /// Get the budget for an exact key
    pub fn get_budget(
        &self,
        owner_id: i64,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE owner_id = ? AND category = ? AND month = ? AND year = ?",
                    BUDGET_COLUMNS
                ),
                params![owner_id, category, month, year],
                row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// All budgets an owner set for one month, by category
    pub fn list_budgets(&self, owner_id: i64, month: u32, year: i32) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE owner_id = ? AND month = ? AND year = ? ORDER BY category",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![owner_id, month, year], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Delete an owned budget
    pub fn delete_budget(&self, owner_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let owner: Option<i64> = conn
            .query_row(
                "SELECT owner_id FROM budgets WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match owner {
            None => Err(Error::NotFound(format!("Budget {} not found", id))),
            Some(o) if o != owner_id => Err(Error::Forbidden(format!(
                "Budget {} belongs to another user",
                id
            ))),
            Some(_) => {
                conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;
                Ok(())
            }
        }
    }
}
