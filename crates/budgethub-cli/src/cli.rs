//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BudgetHub - Track expenses and stay within budget
#[derive(Parser)]
#[command(name = "budgethub")]
#[command(about = "Self-hosted personal budgeting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (DATABASE_URL takes precedence when set)
    #[arg(long, default_value = "budgethub.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Manage monthly category budgets
    Budgets {
        #[command(subcommand)]
        action: BudgetsAction,
    },

    /// Show dashboard summary for a user
    Dashboard {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import expenses from CSV (columns: description, amount, category, date)
    Import {
        /// Username to import for
        #[arg(short, long)]
        user: String,

        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export a user's expenses to CSV
    Export {
        /// Username to export
        #[arg(short, long)]
        user: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest a category for a description
    Categorize {
        /// Expense description
        description: String,

        /// Expense amount
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user
    Add {
        username: String,
        email: String,

        /// Password (falls back to BUDGETHUB_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List a user's expenses
    List {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Substring match on description
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Sort: date_asc, date_desc, amount_asc, amount_desc, category
        #[arg(long, default_value = "date_desc")]
        sort: String,

        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record an expense
    Add {
        /// Username
        #[arg(short, long)]
        user: String,

        description: String,

        amount: f64,

        /// Category (auto-categorized from the description if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Show budget status for a month (default: current)
    List {
        /// Username
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set a category budget (replaces an existing one for the same month)
    Set {
        /// Username
        #[arg(short, long)]
        user: String,

        category: String,

        amount: f64,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        year: Option<i32>,
    },
}
