//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db) plus init and status
//! - `dashboard` - Spend KPIs and breakdowns
//! - `serve` - Web server command
//! - `subscriptions` - Subscription management (add, list, show, transitions, pay)

pub mod core;
pub mod dashboard;
pub mod serve;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use core::*;
pub use dashboard::*;
pub use serve::*;
pub use subscriptions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
