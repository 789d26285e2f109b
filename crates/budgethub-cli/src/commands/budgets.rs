//! Budget command implementations

use anyhow::{Context, Result};

use budgethub_core::{
    analytics::{self, format_currency},
    db::Database,
    BudgetUpsert,
};

use super::{find_user, resolve_month};

pub fn cmd_budgets_list(
    db: &Database,
    username: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let user = find_user(db, username)?;
    let (month, year) = resolve_month(month, year)?;
    let reports = analytics::budget_reports(db, user.id, month, year)?;

    if reports.is_empty() {
        println!("No budgets set for {:02}/{}. Set one with:", month, year);
        println!("  budgethub budgets set --user {} Food 400", username);
        return Ok(());
    }

    println!();
    println!("💰 Budgets for {:02}/{}", month, year);
    println!("   ─────────────────────────────────────────────────────────────");

    for report in &reports {
        let status = &report.status;
        let marker = if status.is_over {
            "🔴"
        } else if status.is_warning {
            "🟡"
        } else {
            "🟢"
        };
        println!(
            "   {} {:<14} {:>10} of {:>10} ({:>5.1}%)  {} left",
            marker,
            report.category,
            format_currency(status.spent),
            format_currency(status.budget),
            status.percentage,
            format_currency(status.remaining)
        );
    }

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    username: &str,
    category: &str,
    amount: f64,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let user = find_user(db, username)?;
    let (month, year) = resolve_month(month, year)?;

    let result = db
        .upsert_budget(user.id, category, amount, month, year)
        .context("Failed to set budget")?;

    let verb = match result {
        BudgetUpsert::Created(_) => "Set",
        BudgetUpsert::Updated(_) => "Updated",
    };
    let budget = result.budget();
    println!(
        "✅ {} {} budget for {:02}/{}: {}",
        verb,
        budget.category,
        budget.month,
        budget.year,
        format_currency(budget.amount)
    );
    Ok(())
}
