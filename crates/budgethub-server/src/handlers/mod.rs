//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod charts;
pub mod dashboard;
pub mod expenses;
pub mod export;
pub mod upload;

// Re-export all handlers for use in router
pub use auth::*;
pub use budgets::*;
pub use categories::*;
pub use charts::*;
pub use dashboard::*;
pub use expenses::*;
pub use export::*;
pub use upload::*;
