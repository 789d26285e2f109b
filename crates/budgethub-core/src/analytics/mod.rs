//! Budget analytics
//!
//! Stateless spending metrics computed on demand from a user's ledger:
//!
//! - **Weekly comparison** - this week versus last week
//! - **Monthly total** and the six-bucket trend series
//! - **Top categories** for a month
//! - **Category comparison** - month over month
//! - **Budget status** - utilization and warning flags
//! - **Overrun prediction** - month-end projection at the current pace
//!
//! Every function reads through the [`Ledger`] trait and never writes. The
//! owner and the current date are always passed in explicitly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use budgethub_core::analytics::{self, Ledger};
//!
//! let today = chrono::Local::now().date_naive();
//! let week = analytics::weekly_comparison(&db, user_id, today)?;
//! let status = analytics::budget_status(&db, user_id, "Food", 3, 2024)?;
//! ```

pub mod dashboard;
pub mod engine;
pub mod types;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Budget, CategoryTotal, Expense};

pub use dashboard::{build_dashboard, format_currency, insights};
pub use engine::{
    budget_reports, budget_status, category_comparison, category_month_over_month,
    days_in_month, monthly_total, monthly_trends, percent_change, predict_budget_overrun,
    previous_month, top_categories, week_bounds, weekly_comparison, DEFAULT_TOP_CATEGORIES,
    TREND_MONTHS,
};
pub use types::{
    BudgetReport, BudgetStatus, CategoryComparison, Dashboard, OverrunPrediction, TrendPoint,
    WeeklyComparison,
};

/// Read access to a user's expenses and budgets
///
/// All amounts are summed over expenses owned by `owner_id` only.
pub trait Ledger {
    /// Sum of amounts with `from <= date <= to`, optionally for one category
    fn sum_expenses(
        &self,
        owner_id: i64,
        category: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64>;

    /// Sum of amounts dated in the given calendar month
    fn month_total(
        &self,
        owner_id: i64,
        category: Option<&str>,
        month: u32,
        year: i32,
    ) -> Result<f64>;

    /// Per-category sums for one calendar month, in no particular order
    fn month_category_totals(
        &self,
        owner_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryTotal>>;

    /// Per-category sums over all time, largest first
    fn category_totals(&self, owner_id: i64) -> Result<Vec<CategoryTotal>>;

    /// The budget for an exact (category, month, year) key
    fn budget_for(
        &self,
        owner_id: i64,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>>;

    /// All budgets set for a month
    fn budgets_for_month(&self, owner_id: i64, month: u32, year: i32) -> Result<Vec<Budget>>;

    /// Most recent expenses, newest first
    fn recent_expenses(&self, owner_id: i64, limit: usize) -> Result<Vec<Expense>>;
}
