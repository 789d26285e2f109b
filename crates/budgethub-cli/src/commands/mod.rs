//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (list, set)
//! - `core` - Core commands (init, categorize) and shared utilities (open_db, find_user)
//! - `expenses` - Expense commands (list, add, delete)
//! - `import` - CSV import and export
//! - `reports` - Dashboard summary
//! - `serve` - Web server command
//! - `users` - User account commands

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod import;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use import::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
