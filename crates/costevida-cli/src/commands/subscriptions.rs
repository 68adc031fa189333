//! Subscription command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use costevida_core::db::SubscriptionFilter;
use costevida_core::models::{
    BillingCycle, PaymentInput, Subscription, SubscriptionInput, SubscriptionStatus,
};
use costevida_core::normalize::monthly_equivalent;

use super::{core::open_db, truncate};

/// Flags collected from `costevida add`
pub struct AddArgs {
    pub name: String,
    pub amount: f64,
    pub billing: String,
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub plan: Option<String>,
    pub currency: String,
    pub start_date: Option<String>,
    pub next_billing: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

fn parse_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid {} format (use YYYY-MM-DD)", flag))
}

fn status_icon(status: SubscriptionStatus) -> &'static str {
    match status {
        SubscriptionStatus::Active => "✅",
        SubscriptionStatus::Paused => "⏸️",
        SubscriptionStatus::Canceled => "❌",
    }
}

pub fn cmd_add(db_path: &Path, no_encrypt: bool, args: AddArgs) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let billing: BillingCycle = args
        .billing
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let input = SubscriptionInput {
        tool_name: args.name,
        vendor: args.vendor,
        category: args.category,
        plan_name: args.plan,
        status: SubscriptionStatus::Active,
        billing,
        amount: args.amount,
        currency: args.currency,
        start_date: parse_date(args.start_date.as_deref(), "--start-date")?,
        next_billing_date: parse_date(args.next_billing.as_deref(), "--next-billing")?,
        notes: args.notes,
        tags: args.tags,
    };

    let sub = db.create_subscription(&input)?;

    println!(
        "✅ Added {} (ID: {}) - {} {:.2}/{}",
        sub.tool_name, sub.id, sub.currency, sub.amount, sub.billing
    );
    let monthly = monthly_equivalent(sub.amount, sub.billing);
    println!("   Monthly equivalent: {:.2}", monthly);

    Ok(())
}

pub fn cmd_list(
    db_path: &Path,
    no_encrypt: bool,
    status: &str,
    category: Option<&str>,
    query: Option<&str>,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let status_filter = if status == "all" {
        None
    } else {
        Some(
            status
                .parse::<SubscriptionStatus>()
                .map_err(|e: String| anyhow::anyhow!(e))?,
        )
    };

    let subscriptions = db.list_subscriptions(
        SubscriptionFilter::new()
            .status(status_filter)
            .category(category)
            .search(query),
    )?;

    if subscriptions.is_empty() {
        println!("No subscriptions found. Add one with:");
        println!("  costevida add --name Notion --amount 8");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ──────────────────────────────────────────────────────────────────");

    for sub in &subscriptions {
        println!(
            "   {} {:>4} │ {:20} │ {:>9}/{:<8} │ ≈{:>8}/mes │ {}",
            status_icon(sub.status),
            sub.id,
            truncate(&sub.tool_name, 20),
            format!("{:.2}", sub.amount),
            sub.billing,
            format!("{:.2}", monthly_equivalent(sub.amount, sub.billing)),
            sub.category.as_deref().unwrap_or("-"),
        );
    }

    println!();
    println!("   {} subscription(s)", subscriptions.len());

    Ok(())
}

pub fn cmd_show(db_path: &Path, no_encrypt: bool, id: i64) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let sub = db
        .get_subscription(id)?
        .ok_or_else(|| anyhow::anyhow!("Subscription not found: {}", id))?;

    print_subscription(&sub);

    let payments = db.list_payments(id)?;
    if payments.is_empty() {
        println!("   No payments recorded.");
    } else {
        println!("   Payments:");
        for payment in &payments {
            println!(
                "     {} │ {} {:.2}{}",
                payment.paid_at,
                payment.currency,
                payment.amount,
                payment
                    .notes
                    .as_deref()
                    .map(|n| format!(" │ {}", n))
                    .unwrap_or_default(),
            );
        }
    }

    Ok(())
}

fn print_subscription(sub: &Subscription) {
    println!();
    println!("📦 {} (ID: {})", sub.tool_name, sub.id);
    println!("   Status:   {} {}", status_icon(sub.status), sub.status);
    println!(
        "   Cost:     {} {:.2}/{} (≈{:.2}/mes)",
        sub.currency,
        sub.amount,
        sub.billing,
        monthly_equivalent(sub.amount, sub.billing)
    );
    if let Some(vendor) = &sub.vendor {
        println!("   Vendor:   {}", vendor);
    }
    if let Some(category) = &sub.category {
        println!("   Category: {}", category);
    }
    if let Some(plan) = &sub.plan_name {
        println!("   Plan:     {}", plan);
    }
    if let Some(date) = sub.start_date {
        println!("   Since:    {}", date);
    }
    if let Some(date) = sub.next_billing_date {
        println!("   Next:     {}", date);
    }
    if let Some(date) = sub.canceled_at {
        println!("   Canceled: {}", date);
    }
    if !sub.tags.is_empty() {
        println!("   Tags:     {}", sub.tags.join(", "));
    }
    if let Some(notes) = &sub.notes {
        println!("   Notes:    {}", notes);
    }
}

pub fn cmd_set_status(
    db_path: &Path,
    no_encrypt: bool,
    id: i64,
    status: SubscriptionStatus,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    if !db.set_subscription_status(id, status)? {
        anyhow::bail!("Subscription not found: {}", id);
    }

    let verb = match status {
        SubscriptionStatus::Active => "reactivated",
        SubscriptionStatus::Paused => "paused",
        SubscriptionStatus::Canceled => "canceled",
    };
    println!("✅ Subscription {} {}", id, verb);

    Ok(())
}

pub fn cmd_remove(db_path: &Path, no_encrypt: bool, id: i64) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    if !db.delete_subscription(id)? {
        anyhow::bail!("Subscription not found: {}", id);
    }

    println!("✅ Subscription {} removed (payment history included)", id);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_pay(
    db_path: &Path,
    no_encrypt: bool,
    id: i64,
    amount: f64,
    date: Option<&str>,
    currency: &str,
    notes: Option<String>,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let paid_at = parse_date(date, "--date")?.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let payment = db.record_payment(
        id,
        &PaymentInput {
            amount,
            currency: currency.to_string(),
            paid_at,
            notes,
        },
    )?;

    println!(
        "✅ Payment recorded for subscription {}: {} {:.2} on {}",
        id, payment.currency, payment.amount, payment.paid_at
    );

    Ok(())
}
