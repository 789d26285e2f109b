//! BudgetHub CLI - Personal budgeting
//!
//! Usage:
//!   budgethub init                                  Initialize database
//!   budgethub users add alice alice@example.com     Create an account
//!   budgethub import --user alice --file march.csv  Import expenses
//!   budgethub dashboard --user alice                Show this month's summary
//!   budgethub serve --port 3000                     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                UsersAction::Add {
                    username,
                    email,
                    password,
                } => {
                    let password = commands::resolve_password(password)?;
                    commands::cmd_users_add(&db, &username, &email, &password)
                }
                UsersAction::List => commands::cmd_users_list(&db),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ExpensesAction::List {
                    user,
                    search,
                    category,
                    from,
                    to,
                    sort,
                    limit,
                } => {
                    let filter = commands::build_filter(
                        search,
                        category,
                        from.as_deref(),
                        to.as_deref(),
                        &sort,
                        limit,
                    )?;
                    commands::cmd_expenses_list(&db, &user, &filter)
                }
                ExpensesAction::Add {
                    user,
                    description,
                    amount,
                    category,
                    date,
                } => commands::cmd_expenses_add(
                    &db,
                    &user,
                    &description,
                    amount,
                    category.as_deref(),
                    date.as_deref(),
                ),
                ExpensesAction::Delete { user, id } => {
                    commands::cmd_expenses_delete(&db, &user, id)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                BudgetsAction::List { user, month, year } => {
                    commands::cmd_budgets_list(&db, &user, month, year)
                }
                BudgetsAction::Set {
                    user,
                    category,
                    amount,
                    month,
                    year,
                } => commands::cmd_budgets_set(&db, &user, &category, amount, month, year),
            }
        }
        Commands::Dashboard { user, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db, &user, json)
        }
        Commands::Import { user, file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &user, &file)
        }
        Commands::Export { user, output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, &user, output.as_deref())
        }
        Commands::Categorize {
            description,
            amount,
        } => commands::cmd_categorize(&description, amount),
    }
}
