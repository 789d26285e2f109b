//! Expense operations
//!
//! Reads and writes are scoped by owner. Single-record operations tell
//! "missing" (`NotFound`) apart from "someone else's" (`Forbidden`).

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::expense_filter::ExpenseQuery;
use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseFilter, NewExpense};

pub(crate) const EXPENSE_COLUMNS: &str =
    "id, owner_id, description, amount, category, date, created_at";

pub(crate) fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: parse_date(&date),
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Record a new expense for `owner_id`
    pub fn insert_expense(&self, owner_id: i64, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (owner_id, description, amount, category, date) VALUES (?, ?, ?, ?, ?)",
            params![
                owner_id,
                expense.description.trim(),
                expense.amount,
                expense.category.trim(),
                expense.date.to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(owner_id, id, amount = expense.amount, "Expense added");

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// Insert many expenses atomically; either all rows land or none do
    pub fn import_expenses(&self, owner_id: i64, expenses: &[NewExpense]) -> Result<usize> {
        for expense in expenses {
            expense.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO expenses (owner_id, description, amount, category, date) VALUES (?, ?, ?, ?, ?)",
            )?;
            for expense in expenses {
                stmt.execute(params![
                    owner_id,
                    expense.description.trim(),
                    expense.amount,
                    expense.category.trim(),
                    expense.date.to_string(),
                ])?;
            }
        }
        tx.commit()?;

        info!(owner_id, count = expenses.len(), "Imported expenses");
        Ok(expenses.len())
    }

    /// Get any expense by ID, regardless of owner
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Get an expense that must belong to `owner_id`
    pub fn get_owned_expense(&self, owner_id: i64, id: i64) -> Result<Expense> {
        let expense = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} not found", id)))?;

        if expense.owner_id != owner_id {
            return Err(Error::Forbidden(format!(
                "Expense {} belongs to another user",
                id
            )));
        }
        Ok(expense)
    }

    /// Replace every editable field of an owned expense
    pub fn update_expense(&self, owner_id: i64, id: i64, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;
        self.get_owned_expense(owner_id, id)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE expenses SET description = ?, amount = ?, category = ?, date = ? WHERE id = ? AND owner_id = ?",
            params![
                expense.description.trim(),
                expense.amount,
                expense.category.trim(),
                expense.date.to_string(),
                id,
                owner_id,
            ],
        )?;

        self.get_owned_expense(owner_id, id)
    }

    /// Delete an owned expense
    pub fn delete_expense(&self, owner_id: i64, id: i64) -> Result<()> {
        self.get_owned_expense(owner_id, id)?;

        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM expenses WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;
        debug!(owner_id, id, "Expense deleted");
        Ok(())
    }

    /// List an owner's expenses with optional search, filters, and sort
    pub fn list_expenses(&self, owner_id: i64, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let query = ExpenseQuery::new(owner_id, filter).build();
        let sql = format!(
            "SELECT {} FROM expenses {} {} {}",
            EXPENSE_COLUMNS, query.where_clause, query.order_clause, query.limit_clause
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(query.param_refs().as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Distinct categories an owner has used, alphabetically
    pub fn expense_categories(&self, owner_id: i64) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM expenses WHERE owner_id = ? ORDER BY category",
        )?;

        let categories = stmt
            .query_map(params![owner_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(categories)
    }
}
