//! User account commands

use anyhow::{Context, Result};

use budgethub_core::{db::Database, Registration};

pub fn cmd_users_add(db: &Database, username: &str, email: &str, password: &str) -> Result<()> {
    let user = db
        .register_user(&Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
        })
        .context("Failed to create user")?;

    println!("✅ Created user '{}' (id {})", user.username, user.id);
    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  budgethub users add <username> <email> --password <pw>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        println!(
            "   [{}] {:<20} {:<30} joined {}",
            user.id,
            user.username,
            user.email,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
