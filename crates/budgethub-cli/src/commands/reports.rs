//! Dashboard summary command

use anyhow::Result;

use budgethub_core::{
    analytics::{self, format_currency},
    db::Database,
};

use super::{find_user, truncate};

pub fn cmd_dashboard(db: &Database, username: &str, json: bool) -> Result<()> {
    let user = find_user(db, username)?;
    let today = chrono::Local::now().date_naive();
    let dashboard = analytics::build_dashboard(db, user.id, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!();
    println!("📊 BudgetHub Dashboard for {}", user.username);
    println!("   ─────────────────────────────");
    println!(
        "   This week:  {} (last week {}, {:+.1}%)",
        format_currency(dashboard.this_week),
        format_currency(dashboard.last_week),
        dashboard.week_change
    );
    println!(
        "   This month: {}",
        format_currency(dashboard.monthly_total)
    );

    if !dashboard.top_categories.is_empty() {
        println!();
        println!("🏆 Top Categories");
        for (i, total) in dashboard.top_categories.iter().enumerate() {
            println!(
                "   {}. {:<14} {:>10}",
                i + 1,
                total.category,
                format_currency(total.total)
            );
        }
    }

    println!();
    println!("📈 Monthly Trend");
    for point in &dashboard.monthly_trends {
        println!("   {:<9} {:>10}", point.label, format_currency(point.total));
    }

    if !dashboard.budget_alerts.is_empty() {
        println!();
        println!("⚠️  Budget Alerts");
        for alert in &dashboard.budget_alerts {
            let state = if alert.status.is_over {
                "over budget"
            } else {
                "nearing limit"
            };
            println!(
                "   {:<14} {:>5.1}% used ({})",
                alert.category, alert.status.percentage, state
            );
        }
    }

    if !dashboard.insights.is_empty() {
        println!();
        println!("💡 Insights");
        for insight in &dashboard.insights {
            println!("   • {}", insight);
        }
    }

    if !dashboard.recent_expenses.is_empty() {
        println!();
        println!("🧾 Recent Expenses");
        for expense in &dashboard.recent_expenses {
            println!(
                "   {} │ {:>10} │ {}",
                expense.date,
                format_currency(expense.amount),
                truncate(&expense.description, 40)
            );
        }
    }

    Ok(())
}
