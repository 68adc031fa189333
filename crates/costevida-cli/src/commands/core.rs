//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Database overview

use std::path::Path;

use anyhow::{Context, Result};
use costevida_core::db::Database;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_str().context("Invalid database path")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a subscription: costevida add --name Notion --amount 8");
    println!("  2. See your spend:     costevida dashboard");
    println!("  3. Start the web UI:   costevida serve");

    Ok(())
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let (total, active) = db.count_subscriptions()?;
    let encrypted = db.is_encrypted().unwrap_or(false);

    println!();
    println!("📁 Database: {}", db.path());
    println!(
        "   Encryption: {}",
        if encrypted { "enabled" } else { "disabled" }
    );
    println!("   Subscriptions: {} ({} active)", total, active);

    Ok(())
}
