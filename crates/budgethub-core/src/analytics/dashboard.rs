//! Dashboard assembly and insight messages

use chrono::{Datelike, NaiveDate};

use super::engine::{
    budget_reports, category_comparison, monthly_total, monthly_trends, predict_budget_overrun,
    top_categories, weekly_comparison, DEFAULT_TOP_CATEGORIES, TREND_MONTHS,
};
use super::types::Dashboard;
use super::Ledger;
use crate::error::Result;
use crate::models::CategoryTotal;

/// Number of recent expenses listed on the dashboard
pub const RECENT_EXPENSES: usize = 10;

/// Top categories that get a month-over-month sentence
const COMPARED_CATEGORIES: usize = 2;

/// Assemble the dashboard for the month containing `today`
pub fn build_dashboard<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    today: NaiveDate,
) -> Result<Dashboard> {
    let (month, year) = (today.month(), today.year());

    let week = weekly_comparison(ledger, owner_id, today)?;
    let top = top_categories(ledger, owner_id, month, year, DEFAULT_TOP_CATEGORIES)?;

    let budget_alerts = budget_reports(ledger, owner_id, month, year)?
        .into_iter()
        .filter(|r| r.status.needs_attention())
        .collect();

    Ok(Dashboard {
        this_week: week.this_week,
        last_week: week.last_week,
        week_change: week.change_percent,
        monthly_total: monthly_total(ledger, owner_id, month, year)?,
        insights: insights(ledger, owner_id, today, &top)?,
        top_categories: top,
        category_totals: ledger.category_totals(owner_id)?,
        monthly_trends: monthly_trends(ledger, owner_id, today, TREND_MONTHS)?,
        budget_alerts,
        recent_expenses: ledger.recent_expenses(owner_id, RECENT_EXPENSES)?,
    })
}

/// Plain-language observations about the current month.
///
/// In order: the top categories, month-over-month changes for the two
/// largest, then each budget whose pace projects past its limit.
pub fn insights<L: Ledger + ?Sized>(
    ledger: &L,
    owner_id: i64,
    today: NaiveDate,
    top: &[CategoryTotal],
) -> Result<Vec<String>> {
    let (month, year) = (today.month(), today.year());
    let mut messages = Vec::new();

    if !top.is_empty() {
        let names: Vec<&str> = top.iter().map(|t| t.category.as_str()).collect();
        messages.push(format!(
            "Your top 3 expense categories this month are {}.",
            names.join(", ")
        ));
    }

    for total in top.iter().take(COMPARED_CATEGORIES) {
        let cmp = category_comparison(ledger, owner_id, &total.category, month, year)?;
        if cmp.change_percent != 0.0 {
            let direction = if cmp.change_percent > 0.0 {
                "more"
            } else {
                "less"
            };
            messages.push(format!(
                "You spent {:.1}% {} on {} compared to last month.",
                cmp.change_percent.abs(),
                direction,
                cmp.category
            ));
        }
    }

    let mut budgets = ledger.budgets_for_month(owner_id, month, year)?;
    budgets.sort_by(|a, b| a.category.cmp(&b.category));
    for budget in budgets {
        let prediction =
            predict_budget_overrun(ledger, owner_id, &budget.category, month, year, today)?;
        if let Some(p) = prediction.filter(|p| p.will_exceed) {
            messages.push(format!(
                "You are likely to exceed your budget for {} if current pace continues. \
                 Projected overrun: {}",
                budget.category,
                format_currency(p.overrun)
            ));
        }
    }

    Ok(messages)
}

/// Format an amount as dollars with thousands separators, e.g. `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, cents)
}
