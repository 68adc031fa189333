//! Dashboard command
//!
//! Prints the KPI cards and breakdowns the web dashboard shows. All the
//! two-decimal rounding happens here at display time; the aggregation
//! itself works on unrounded values.

use std::path::Path;

use anyhow::Result;

use costevida_core::db::SubscriptionFilter;
use costevida_core::models::SubscriptionStatus;
use costevida_core::normalize::{calculate_kpis, category_breakdown, vendor_breakdown};

use super::{core::open_db, truncate};

pub fn cmd_dashboard(db_path: &Path, no_encrypt: bool, status: &str) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    // Same default fetch as the web dashboard: active rows unless "all"
    // (or another status) is asked for. Within the fetched set the KPIs
    // skip non-active rows on their own while the breakdowns keep them.
    let status_filter = if status == "all" {
        None
    } else {
        Some(
            status
                .parse::<SubscriptionStatus>()
                .map_err(|e: String| anyhow::anyhow!(e))?,
        )
    };

    let subscriptions = db.list_subscriptions(SubscriptionFilter::new().status(status_filter))?;

    if subscriptions.is_empty() {
        println!("Your dashboard is empty. Add a subscription first:");
        println!("  costevida add --name Notion --amount 8");
        return Ok(());
    }

    let kpis = calculate_kpis(&subscriptions);

    println!();
    println!("💸 Coste de Vida Digital");
    println!("   ────────────────────────────────────────");
    println!("   Gasto mensual estimado:  {:>10.2}", kpis.monthly_total);
    println!("   Gasto anual estimado:    {:>10.2}", kpis.yearly_total);
    println!("   Suscripciones activas:   {:>10}", kpis.active_count);

    let categories = category_breakdown(&subscriptions);
    if !categories.is_empty() {
        println!();
        println!("   Gastos por categoría:");
        for entry in &categories {
            println!("     {:24} {:>10.2}", truncate(&entry.label, 24), entry.value);
        }
    }

    let vendors = vendor_breakdown(&subscriptions);
    if !vendors.is_empty() {
        println!();
        println!("   Top proveedores:");
        for entry in &vendors {
            println!("     {:24} {:>10.2}", truncate(&entry.label, 24), entry.value);
        }
    }

    Ok(())
}
