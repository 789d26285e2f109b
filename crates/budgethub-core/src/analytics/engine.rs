//! Spending metrics over a [`Ledger`]

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use super::types::{
    BudgetReport, BudgetStatus, CategoryComparison, OverrunPrediction, TrendPoint,
    WeeklyComparison,
};
use super::Ledger;
use crate::error::{Error, Result};
use crate::models::CategoryTotal;

/// Number of categories shown as "top" on the dashboard
pub const DEFAULT_TOP_CATEGORIES: usize = 3;

/// Number of 30-day steps in the monthly trend series
pub const TREND_MONTHS: u32 = 6;

/// Percentage change from `prior` to `current`.
///
/// With no prior spending the change is 0 when nothing was spent now either,
/// and 100 otherwise.
pub fn percent_change(current: f64, prior: f64) -> f64 {
    if prior == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - prior) / prior * 100.0
    }
}

/// The month before `month`/`year`, rolling January back to December
pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month <= 1 {
        (12, year - 1)
    } else {
        (month - 1, year)
    }
}

/// Calendar length of a month, leap years included
pub fn days_in_month(month: u32, year: i32) -> Result<u32> {
    let invalid = || Error::InvalidData(format!("Invalid month: {}-{:02}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_month, next_year) = if month == 12 {
        (1, year + 1)
    } else {
        (month + 1, year)
    };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;

    Ok((next - first).num_days() as u32)
}

/// Monday and Sunday of the week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Spending in the current Monday-to-Sunday week versus the seven days before it
pub fn weekly_comparison<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    today: NaiveDate,
) -> Result<WeeklyComparison> {
    let (start, end) = week_bounds(today);
    let last_start = start - Duration::days(7);
    let last_end = start - Duration::days(1);

    let this_week = ledger.sum_expenses(owner_id, None, start, end)?;
    let last_week = ledger.sum_expenses(owner_id, None, last_start, last_end)?;

    debug!(owner_id, %start, this_week, last_week, "Weekly comparison");

    Ok(WeeklyComparison {
        this_week,
        last_week,
        change_percent: percent_change(this_week, last_week),
    })
}

/// Total spent in one calendar month
pub fn monthly_total<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    month: u32,
    year: i32,
) -> Result<f64> {
    ledger.month_total(owner_id, None, month, year)
}

/// Largest categories for a month, ties broken by category name
pub fn top_categories<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    month: u32,
    year: i32,
    limit: usize,
) -> Result<Vec<CategoryTotal>> {
    let mut totals = ledger.month_category_totals(owner_id, month, year)?;
    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals.truncate(limit);
    Ok(totals)
}

/// One category's spending this month versus the month before
pub fn category_comparison<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    category: &str,
    month: u32,
    year: i32,
) -> Result<CategoryComparison> {
    let (prev_month, prev_year) = previous_month(month, year);

    let current = ledger.month_total(owner_id, Some(category), month, year)?;
    let previous = ledger.month_total(owner_id, Some(category), prev_month, prev_year)?;

    Ok(CategoryComparison {
        category: category.to_string(),
        current,
        previous,
        change_percent: percent_change(current, previous),
    })
}

/// Month-over-month comparison for every category the user has ever used,
/// in name order
pub fn category_month_over_month<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<CategoryComparison>> {
    let mut categories: Vec<String> = ledger
        .category_totals(owner_id)?
        .into_iter()
        .map(|t| t.category)
        .collect();
    categories.sort();
    categories.dedup();

    categories
        .iter()
        .map(|c| category_comparison(ledger, owner_id, c, month, year))
        .collect()
}

/// Budget utilization for a category and month.
///
/// Returns `None` when no budget is set for that exact key.
pub fn budget_status<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    category: &str,
    month: u32,
    year: i32,
) -> Result<Option<BudgetStatus>> {
    let Some(budget) = ledger.budget_for(owner_id, category, month, year)? else {
        return Ok(None);
    };

    let spent = ledger.month_total(owner_id, Some(category), month, year)?;
    Ok(Some(BudgetStatus::new(budget.amount, spent)))
}

/// Status of every budget set for a month, in category order
pub fn budget_reports<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<BudgetReport>> {
    let mut budgets = ledger.budgets_for_month(owner_id, month, year)?;
    budgets.sort_by(|a, b| a.category.cmp(&b.category));

    budgets
        .into_iter()
        .map(|budget| {
            let spent = ledger.month_total(owner_id, Some(&budget.category), month, year)?;
            Ok(BudgetReport {
                budget_id: budget.id,
                status: BudgetStatus::new(budget.amount, spent),
                category: budget.category,
                month,
                year,
            })
        })
        .collect()
}

/// Project month-end spending from the average daily spend so far.
///
/// Days passed is the day of month of `today`, capped at the month length.
/// Returns `None` when no budget is set.
pub fn predict_budget_overrun<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    category: &str,
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<Option<OverrunPrediction>> {
    let Some(budget) = ledger.budget_for(owner_id, category, month, year)? else {
        return Ok(None);
    };

    let spent = ledger.month_total(owner_id, Some(category), month, year)?;
    let days_in_month = days_in_month(month, year)?;
    let days_passed = today.day().min(days_in_month);

    let daily_average = if days_passed > 0 {
        spent / days_passed as f64
    } else {
        0.0
    };
    let projected_total = daily_average * days_in_month as f64;
    let will_exceed = projected_total > budget.amount;

    Ok(Some(OverrunPrediction {
        budget: budget.amount,
        spent,
        days_in_month,
        days_passed,
        daily_average,
        projected_total,
        will_exceed,
        overrun: if will_exceed {
            projected_total - budget.amount
        } else {
            0.0
        },
    }))
}

/// Monthly totals for the trend chart, oldest first.
///
/// Step `i` is the calendar month of `today - 30*i days`. Near month ends two
/// steps can land in the same month and another month is skipped; a repeated
/// month is kept once, at its first position, so the series may be shorter
/// than `months`.
pub fn monthly_trends<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    today: NaiveDate,
    months: u32,
) -> Result<Vec<TrendPoint>> {
    let mut points: Vec<TrendPoint> = Vec::with_capacity(months as usize);
    for i in (0..months).rev() {
        let date = today - Duration::days(30 * i as i64);
        let key = date.format("%Y-%m").to_string();
        // Two steps can land in the same calendar month; keep the first
        if points.iter().any(|p| p.key == key) {
            continue;
        }
        let total = ledger.month_total(owner_id, None, date.month(), date.year())?;
        points.push(TrendPoint {
            key,
            label: date.format("%b %Y").to_string(),
            month: date.month(),
            year: date.year(),
            total,
        });
    }
    Ok(points)
}
