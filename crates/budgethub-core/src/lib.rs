//! BudgetHub Core Library
//!
//! Shared functionality for the BudgetHub budgeting app:
//! - Database access and migrations (users, expenses, budgets)
//! - Budget analytics over an injected ledger (weekly/monthly totals,
//!   top categories, budget status, overrun prediction, dashboard insights)
//! - Keyword-based expense categorization
//! - CSV import and export
//! - Password hashing and registration rules

pub mod analytics;
pub mod auth;
pub mod categorize;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;

/// In-memory ledger for analytics tests
#[cfg(test)]
mod test_utils;

pub use analytics::Ledger;
pub use auth::Registration;
pub use categorize::categorize_transaction;
pub use db::Database;
pub use error::{Error, Result};
pub use import::ImportSummary;
pub use models::{Budget, BudgetUpsert, Category, Expense, ExpenseFilter, NewExpense, User};
