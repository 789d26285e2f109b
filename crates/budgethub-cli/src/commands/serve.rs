//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use budgethub_server::{ServerConfig, ALLOWED_ORIGINS_ENV, SECRET_KEY_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting BudgetHub web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();

    if std::env::var(SECRET_KEY_ENV).is_ok() {
        println!("   🔒 Sessions: signed with {}", SECRET_KEY_ENV);
    } else {
        println!();
        println!("   ⚠️  {} not set - sessions use a development key!", SECRET_KEY_ENV);
    }
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path)?;
    let static_dir = static_dir
        .map(|d| d.to_str().context("Static directory path is not valid UTF-8"))
        .transpose()?;

    budgethub_server::serve_with_config(db, host, port, static_dir, config).await
}
