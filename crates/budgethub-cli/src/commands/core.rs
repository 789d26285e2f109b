//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `find_user` - Resolve a `--user` argument
//! - `cmd_init` - Initialize the database
//! - `cmd_categorize` - Preview keyword categorization

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};

use budgethub_core::{categorize_transaction, db::Database, models::User};

/// Environment variable consulted by `users add` when `--password` is absent
pub const PASSWORD_ENV: &str = "BUDGETHUB_PASSWORD";

/// Open the database at `DATABASE_URL` if set, otherwise at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    tracing::debug!("Opening database (default path {})", path_str);
    Database::from_env(path_str).context("Failed to open database")
}

/// Look up a user by username
pub fn find_user(db: &Database, username: &str) -> Result<User> {
    db.get_user_by_username(username)?
        .with_context(|| format!("User '{}' not found. Create it with: budgethub users add", username))
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", value))
}

/// Fill in the current month/year for missing arguments
pub fn resolve_month(month: Option<u32>, year: Option<i32>) -> Result<(u32, i32)> {
    let today = chrono::Local::now().date_naive();
    let month = month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12, got {}", month);
    }
    Ok((month, year.unwrap_or(today.year())))
}

/// Take the password from `--password`, falling back to `BUDGETHUB_PASSWORD`
pub fn resolve_password(password: Option<String>) -> Result<String> {
    password
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .filter(|p| !p.is_empty())
        .with_context(|| format!("Provide --password or set {}", PASSWORD_ENV))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let users = db.list_users()?;

    println!("   Path: {}", db.path());
    println!("   Users: {}", users.len());
    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create an account: budgethub users add <username> <email> --password <pw>");
    println!("  2. Import expenses: budgethub import --user <username> --file expenses.csv");
    println!("  3. Start web UI: budgethub serve");

    Ok(())
}

pub fn cmd_categorize(description: &str, amount: f64) -> Result<()> {
    let category = categorize_transaction(description, amount);
    println!("🏷️  \"{}\" → {}", description, category);
    Ok(())
}
