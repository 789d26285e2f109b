//! CSV import and export commands

use std::path::Path;

use anyhow::{Context, Result};

use budgethub_core::db::Database;

use super::find_user;

pub fn cmd_import(db: &Database, username: &str, file: &Path) -> Result<()> {
    let user = find_user(db, username)?;

    println!("📥 Importing {}...", file.display());
    let data = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let today = chrono::Local::now().date_naive();
    let summary = db
        .import_expenses_csv(user.id, &data, today)
        .context("Failed to import CSV")?;
    tracing::debug!(
        "Import of {} for user {}: {} imported, {} skipped",
        file.display(),
        user.id,
        summary.imported_count,
        summary.error_count
    );

    println!("✅ {}", summary.message);
    if summary.error_count > 0 {
        println!("   ⚠️  {} row(s) skipped:", summary.error_count);
        for error in &summary.errors {
            println!("      {}", error);
        }
        if summary.error_count > summary.errors.len() {
            println!(
                "      ... and {} more",
                summary.error_count - summary.errors.len()
            );
        }
    }

    Ok(())
}

pub fn cmd_export(db: &Database, username: &str, output: Option<&Path>) -> Result<()> {
    let user = find_user(db, username)?;
    let csv = db.export_expenses_csv(user.id)?;
    let rows = csv.lines().count().saturating_sub(1);

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} expenses to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
