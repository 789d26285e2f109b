//! Result types returned by the analytics functions

use serde::{Deserialize, Serialize};

use crate::models::{CategoryTotal, Expense};

/// Spending this week versus the previous seven days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    pub this_week: f64,
    pub last_week: f64,
    pub change_percent: f64,
}

/// One category's spending this month versus the previous month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: String,
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
}

/// Budget utilization for a (category, month, year) key
///
/// `is_over` and `is_warning` are mutually exclusive. `percentage` is not
/// capped, so an overspent budget reports more than 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub is_over: bool,
    pub is_warning: bool,
}

impl BudgetStatus {
    /// Warning threshold, in percent of the budget
    pub const WARNING_PERCENT: f64 = 80.0;

    pub fn new(budget: f64, spent: f64) -> Self {
        let percentage = if budget > 0.0 {
            spent / budget * 100.0
        } else {
            0.0
        };
        let is_over = spent > budget;

        Self {
            budget,
            spent,
            remaining: budget - spent,
            percentage,
            is_over,
            is_warning: percentage >= Self::WARNING_PERCENT && !is_over,
        }
    }

    /// Over budget or close to it
    pub fn needs_attention(&self) -> bool {
        self.is_over || self.is_warning
    }
}

/// A budget together with its current status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub budget_id: i64,
    pub category: String,
    pub month: u32,
    pub year: i32,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

/// Month-end projection at the current daily pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverrunPrediction {
    pub budget: f64,
    pub spent: f64,
    pub days_in_month: u32,
    pub days_passed: u32,
    pub daily_average: f64,
    pub projected_total: f64,
    pub will_exceed: bool,
    /// `projected_total - budget` when exceeding, otherwise 0
    pub overrun: f64,
}

/// One bucket of the monthly trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub key: String,
    /// `Mon YYYY`, for chart axes
    pub label: String,
    pub month: u32,
    pub year: i32,
    pub total: f64,
}

/// Everything the dashboard shows for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub this_week: f64,
    pub last_week: f64,
    pub week_change: f64,
    pub monthly_total: f64,
    pub top_categories: Vec<CategoryTotal>,
    pub category_totals: Vec<CategoryTotal>,
    pub monthly_trends: Vec<TrendPoint>,
    pub budget_alerts: Vec<BudgetReport>,
    pub insights: Vec<String>,
    pub recent_expenses: Vec<Expense>,
}
