//! Coste de Vida Digital CLI - subscription spend tracker
//!
//! Usage:
//!   costevida init                Initialize database
//!   costevida add --name Notion --amount 8
//!   costevida list --status active
//!   costevida dashboard           Spend KPIs and breakdowns
//!   costevida serve --port 3000   Start web server

mod cli;
mod commands;


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
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Add {
            name,
            amount,
            billing,
            category,
            vendor,
            plan,
            currency,
            start_date,
            next_billing,
            notes,
            tags,
        } => commands::cmd_add(
            &cli.db,
            cli.no_encrypt,
            commands::AddArgs {
                name,
                amount,
                billing,
                category,
                vendor,
                plan,
                currency,
                start_date,
                next_billing,
                notes,
                tags,
            },
        ),
        Commands::List {
            status,
            category,
            query,
        } => commands::cmd_list(
            &cli.db,
            cli.no_encrypt,
            &status,
            category.as_deref(),
            query.as_deref(),
        ),
        Commands::Show { id } => commands::cmd_show(&cli.db, cli.no_encrypt, id),
        Commands::Cancel { id } => commands::cmd_set_status(
            &cli.db,
            cli.no_encrypt,
            id,
            costevida_core::SubscriptionStatus::Canceled,
        ),
        Commands::Pause { id } => commands::cmd_set_status(
            &cli.db,
            cli.no_encrypt,
            id,
            costevida_core::SubscriptionStatus::Paused,
        ),
        Commands::Resume { id } => commands::cmd_set_status(
            &cli.db,
            cli.no_encrypt,
            id,
            costevida_core::SubscriptionStatus::Active,
        ),
        Commands::Remove { id } => commands::cmd_remove(&cli.db, cli.no_encrypt, id),
        Commands::Pay {
            id,
            amount,
            date,
            currency,
            notes,
        } => commands::cmd_pay(
            &cli.db,
            cli.no_encrypt,
            id,
            amount,
            date.as_deref(),
            &currency,
            notes,
        ),
        Commands::Dashboard { status } => commands::cmd_dashboard(&cli.db, cli.no_encrypt, &status),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            api_keys,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                cli.no_encrypt,
                &host,
                port,
                no_auth,
                api_keys,
                static_dir.as_deref(),
            )
            .await
        }
    }
}
