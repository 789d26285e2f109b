//! Expense command implementations

use anyhow::{anyhow, Context, Result};

use budgethub_core::{
    analytics::format_currency,
    categorize_transaction,
    db::Database,
    models::{ExpenseFilter, ExpenseSort, NewExpense},
};

use super::{find_user, parse_date, truncate};

/// Build a list filter from CLI arguments
pub fn build_filter(
    search: Option<String>,
    category: Option<String>,
    from: Option<&str>,
    to: Option<&str>,
    sort: &str,
    limit: i64,
) -> Result<ExpenseFilter> {
    Ok(ExpenseFilter {
        search,
        category,
        date_from: from.map(parse_date).transpose()?,
        date_to: to.map(parse_date).transpose()?,
        sort: sort.parse::<ExpenseSort>().map_err(|e| anyhow!(e))?,
        limit: Some(limit),
    })
}

pub fn cmd_expenses_list(db: &Database, username: &str, filter: &ExpenseFilter) -> Result<()> {
    let user = find_user(db, username)?;
    let expenses = db.list_expenses(user.id, filter)?;

    if expenses.is_empty() {
        println!("No expenses found. Add one with:");
        println!("  budgethub expenses add --user {} \"Lunch\" 12.50", username);
        return Ok(());
    }

    println!();
    println!("📝 Expenses for {}", user.username);
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        println!(
            "   [{}] {} │ {:>10} │ {:<13} │ {}",
            expense.id,
            expense.date,
            format_currency(expense.amount),
            expense.category,
            truncate(&expense.description, 35)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {} shown, {} total", expenses.len(), format_currency(total));

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    username: &str,
    description: &str,
    amount: f64,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let user = find_user(db, username)?;

    let category = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_string(),
        None => {
            let suggested = categorize_transaction(description, amount);
            tracing::debug!("Categorized '{}' as {}", description, suggested);
            println!("   🏷️  Auto-categorized as {}", suggested);
            suggested.to_string()
        }
    };
    let date = match date {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let expense = db
        .insert_expense(
            user.id,
            &NewExpense {
                description: description.to_string(),
                amount,
                category,
                date,
            },
        )
        .context("Failed to add expense")?;

    println!(
        "✅ Added expense #{}: {} {} ({}, {})",
        expense.id,
        expense.description,
        format_currency(expense.amount),
        expense.category,
        expense.date
    );
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, username: &str, id: i64) -> Result<()> {
    let user = find_user(db, username)?;
    db.delete_expense(user.id, id)
        .with_context(|| format!("Failed to delete expense {}", id))?;

    println!("🗑️  Deleted expense #{}", id);
    Ok(())
}
