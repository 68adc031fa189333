//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Coste de Vida Digital - track what your software subscriptions cost
#[derive(Parser)]
#[command(name = "costevida")]
#[command(about = "Self-hosted subscription spend tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "costevida.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set COSTEVIDA_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add a subscription
    Add {
        /// Name of the tool or service
        #[arg(short, long)]
        name: String,

        /// Charge amount per billing cycle
        #[arg(short, long)]
        amount: f64,

        /// Billing cycle: monthly, yearly, weekly, one_time
        #[arg(short, long, default_value = "monthly")]
        billing: String,

        /// Category label (e.g. "IA", "Productividad")
        #[arg(short, long)]
        category: Option<String>,

        /// Vendor/provider name
        #[arg(long)]
        vendor: Option<String>,

        /// Plan name (e.g. "Pro", "Team")
        #[arg(long)]
        plan: Option<String>,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Next billing date (YYYY-MM-DD)
        #[arg(long)]
        next_billing: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List subscriptions
    List {
        /// Filter by status: active, canceled, paused, all
        #[arg(short, long, default_value = "all")]
        status: String,

        /// Filter by category (substring match)
        #[arg(short, long)]
        category: Option<String>,

        /// Search by tool name (substring match)
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show a subscription with its payment history
    Show {
        /// Subscription ID
        id: i64,
    },

    /// Cancel a subscription (stamps the cancellation date)
    Cancel {
        /// Subscription ID
        id: i64,
    },

    /// Pause a subscription
    Pause {
        /// Subscription ID
        id: i64,
    },

    /// Reactivate a canceled or paused subscription
    Resume {
        /// Subscription ID
        id: i64,
    },

    /// Delete a subscription and its payment history
    Remove {
        /// Subscription ID
        id: i64,
    },

    /// Record a payment against a subscription
    Pay {
        /// Subscription ID
        id: i64,

        /// Amount paid
        #[arg(short, long)]
        amount: f64,

        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Currency code
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show spend KPIs and category/vendor breakdowns
    Dashboard {
        /// Statuses to include: active, canceled, paused, all
        #[arg(short, long, default_value = "active")]
        status: String,
    },

    /// Show database overview
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a
        /// network. By default the server requires a bearer API key.
        #[arg(long)]
        no_auth: bool,

        /// Accepted API key (repeatable)
        #[arg(long = "api-key")]
        api_keys: Vec<String>,

        /// Directory containing static files to serve (e.g. ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
