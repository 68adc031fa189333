//! Cost normalization and dashboard aggregation
//!
//! Pure functions over an already-fetched slice of subscriptions. No I/O,
//! no caching: aggregates are recomputed from scratch on every call, and
//! amounts are summed as raw f64 values with no rounding. Two-decimal
//! display formatting is a presentation concern and never happens here.
//!
//! Amounts are also never converted between currencies; a mixed-currency
//! portfolio produces a raw numeric sum.

use std::collections::HashMap;

use crate::models::{
    BillingCycle, BreakdownEntry, Kpis, Subscription, SubscriptionStatus, UNCATEGORIZED_LABEL,
};

/// Average weeks per month (52.1429 / 12)
const WEEKS_PER_MONTH: f64 = 4.34524;

/// Number of vendors shown in the dashboard ranking
const TOP_VENDOR_LIMIT: usize = 5;

/// Convert an amount to its monthly-equivalent cost.
///
/// One-time purchases normalize to zero: they do not count toward recurring
/// spend.
pub fn monthly_equivalent(amount: f64, billing: BillingCycle) -> f64 {
    match billing {
        BillingCycle::Monthly => amount,
        BillingCycle::Yearly => amount / 12.0,
        BillingCycle::Weekly => amount * WEEKS_PER_MONTH,
        BillingCycle::OneTime => 0.0,
    }
}

/// Compute the dashboard KPIs in a single pass.
///
/// Only `Active` subscriptions contribute; canceled and paused records are
/// skipped entirely (they count toward neither the total nor
/// `active_count`). Empty input yields all zeros.
pub fn calculate_kpis(subscriptions: &[Subscription]) -> Kpis {
    let mut monthly_total = 0.0;
    let mut active_count = 0;

    for sub in subscriptions {
        if sub.status == SubscriptionStatus::Active {
            active_count += 1;
            monthly_total += monthly_equivalent(sub.amount, sub.billing);
        }
    }

    Kpis {
        monthly_total,
        yearly_total: monthly_total * 12.0,
        active_count,
    }
}

/// Group normalized cost by category.
///
/// Unlike the KPIs, breakdowns include records of every status: the
/// dashboard charts show the whole portfolio, not just active spend.
/// Records without a category fall under [`UNCATEGORIZED_LABEL`].
pub fn category_breakdown(subscriptions: &[Subscription]) -> Vec<BreakdownEntry> {
    rank(fold_by(subscriptions, |sub| {
        match sub.category.as_deref().filter(|c| !c.is_empty()) {
            Some(category) => category.to_string(),
            None => UNCATEGORIZED_LABEL.to_string(),
        }
    }))
}

/// Group normalized cost by vendor, truncated to the top 5.
///
/// Records without a vendor are grouped under their own tool name. Like
/// [`category_breakdown`], this is status-agnostic.
pub fn vendor_breakdown(subscriptions: &[Subscription]) -> Vec<BreakdownEntry> {
    let mut entries = rank(fold_by(subscriptions, |sub| {
        match sub.vendor.as_deref().filter(|v| !v.is_empty()) {
            Some(vendor) => vendor.to_string(),
            None => sub.tool_name.clone(),
        }
    }));
    entries.truncate(TOP_VENDOR_LIMIT);
    entries
}

/// Accumulate monthly-equivalent cost keyed by the resolved group label
fn fold_by<F>(subscriptions: &[Subscription], key: F) -> HashMap<String, f64>
where
    F: Fn(&Subscription) -> String,
{
    let mut groups: HashMap<String, f64> = HashMap::new();
    for sub in subscriptions {
        let cost = monthly_equivalent(sub.amount, sub.billing);
        *groups.entry(key(sub)).or_insert(0.0) += cost;
    }
    groups
}

/// Sort grouped totals by value descending; equal values break ties
/// lexicographically by label so the ordering is deterministic.
fn rank(groups: HashMap<String, f64>) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = groups
        .into_iter()
        .map(|(label, value)| BreakdownEntry { label, value })
        .collect();

    entries.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const EPSILON: f64 = 1e-9;

    fn sub(
        tool_name: &str,
        amount: f64,
        billing: BillingCycle,
        status: SubscriptionStatus,
        category: Option<&str>,
        vendor: Option<&str>,
    ) -> Subscription {
        Subscription {
            id: 0,
            tool_name: tool_name.to_string(),
            vendor: vendor.map(String::from),
            category: category.map(String::from),
            plan_name: None,
            status,
            billing,
            amount,
            currency: "USD".to_string(),
            start_date: None,
            next_billing_date: None,
            canceled_at: None,
            notes: None,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_monthly_passes_through() {
        assert_eq!(monthly_equivalent(12.99, BillingCycle::Monthly), 12.99);
        assert_eq!(monthly_equivalent(0.0, BillingCycle::Monthly), 0.0);
    }

    #[test]
    fn test_yearly_divides_by_twelve() {
        assert_eq!(monthly_equivalent(120.0, BillingCycle::Yearly), 10.0);
        assert!((monthly_equivalent(99.0, BillingCycle::Yearly) - 8.25).abs() < EPSILON);
    }

    #[test]
    fn test_weekly_uses_average_weeks_per_month() {
        assert!((monthly_equivalent(5.0, BillingCycle::Weekly) - 21.7262).abs() < EPSILON);
    }

    #[test]
    fn test_one_time_is_excluded() {
        assert_eq!(monthly_equivalent(499.0, BillingCycle::OneTime), 0.0);
    }

    #[test]
    fn test_unknown_billing_string_passes_amount_through() {
        // Storage-boundary fallback: unknown values decode as monthly,
        // which leaves the amount unchanged.
        let billing = BillingCycle::from_db("biennial");
        assert_eq!(monthly_equivalent(42.0, billing), 42.0);
    }

    #[test]
    fn test_kpis_empty_input() {
        let kpis = calculate_kpis(&[]);
        assert_eq!(kpis.monthly_total, 0.0);
        assert_eq!(kpis.yearly_total, 0.0);
        assert_eq!(kpis.active_count, 0);
    }

    #[test]
    fn test_yearly_total_is_twelve_times_monthly() {
        let subs = vec![
            sub("A", 7.5, BillingCycle::Monthly, SubscriptionStatus::Active, None, None),
            sub("B", 33.0, BillingCycle::Yearly, SubscriptionStatus::Active, None, None),
        ];
        let kpis = calculate_kpis(&subs);
        assert_eq!(kpis.yearly_total, kpis.monthly_total * 12.0);
    }

    #[test]
    fn test_kpis_skip_non_active_entirely() {
        let subs = vec![
            sub("A", 10.0, BillingCycle::Monthly, SubscriptionStatus::Canceled, None, None),
            sub("B", 20.0, BillingCycle::Monthly, SubscriptionStatus::Paused, None, None),
        ];
        let kpis = calculate_kpis(&subs);
        assert_eq!(kpis.monthly_total, 0.0);
        assert_eq!(kpis.active_count, 0);
    }

    #[test]
    fn test_breakdown_includes_non_active_but_kpis_do_not() {
        let subs = vec![
            sub("A", 10.0, BillingCycle::Monthly, SubscriptionStatus::Active, Some("AI"), None),
            sub("B", 20.0, BillingCycle::Monthly, SubscriptionStatus::Canceled, Some("AI"), None),
        ];

        let breakdown = category_breakdown(&subs);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].label, "AI");
        assert!((breakdown[0].value - 30.0).abs() < EPSILON);

        let kpis = calculate_kpis(&subs);
        assert!((kpis.monthly_total - 10.0).abs() < EPSILON);
        assert_eq!(kpis.active_count, 1);
    }

    #[test]
    fn test_missing_category_falls_back_to_uncategorized() {
        let subs = vec![
            sub("A", 5.0, BillingCycle::Monthly, SubscriptionStatus::Active, None, None),
            sub("B", 5.0, BillingCycle::Monthly, SubscriptionStatus::Active, Some(""), None),
        ];
        let breakdown = category_breakdown(&subs);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].label, UNCATEGORIZED_LABEL);
        assert!((breakdown[0].value - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_missing_vendor_falls_back_to_tool_name() {
        let subs = vec![sub(
            "Notion",
            8.0,
            BillingCycle::Monthly,
            SubscriptionStatus::Active,
            None,
            None,
        )];
        let breakdown = vendor_breakdown(&subs);
        assert_eq!(breakdown[0].label, "Notion");
    }

    #[test]
    fn test_vendor_breakdown_truncates_to_top_five() {
        let subs: Vec<Subscription> = (1..=7)
            .map(|i| {
                sub(
                    &format!("Tool{}", i),
                    i as f64,
                    BillingCycle::Monthly,
                    SubscriptionStatus::Active,
                    None,
                    Some(&format!("Vendor{}", i)),
                )
            })
            .collect();

        let breakdown = vendor_breakdown(&subs);
        assert_eq!(breakdown.len(), 5);
        // Highest five values, descending
        assert_eq!(breakdown[0].label, "Vendor7");
        assert_eq!(breakdown[4].label, "Vendor3");
        for pair in breakdown.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
    }

    #[test]
    fn test_equal_values_tie_break_lexicographically() {
        let subs = vec![
            sub("A", 10.0, BillingCycle::Monthly, SubscriptionStatus::Active, Some("Música"), None),
            sub("B", 10.0, BillingCycle::Monthly, SubscriptionStatus::Active, Some("Diseño"), None),
        ];
        let breakdown = category_breakdown(&subs);
        assert_eq!(breakdown[0].label, "Diseño");
        assert_eq!(breakdown[1].label, "Música");
    }

    #[test]
    fn test_dashboard_scenario() {
        let subs = vec![
            sub(
                "Notion",
                12.0,
                BillingCycle::Monthly,
                SubscriptionStatus::Active,
                Some("Productividad"),
                None,
            ),
            sub(
                "Netflix",
                120.0,
                BillingCycle::Yearly,
                SubscriptionStatus::Active,
                Some("Entretenimiento"),
                None,
            ),
            sub(
                "ChatGPT",
                5.0,
                BillingCycle::Weekly,
                SubscriptionStatus::Paused,
                Some("IA"),
                None,
            ),
        ];

        let kpis = calculate_kpis(&subs);
        assert!((kpis.monthly_total - 22.0).abs() < EPSILON);
        assert_eq!(kpis.yearly_total, kpis.monthly_total * 12.0);
        assert!((kpis.yearly_total - 264.0).abs() < EPSILON);
        assert_eq!(kpis.active_count, 2);

        // The paused IA subscription still shows up in the charts
        let breakdown = category_breakdown(&subs);
        let ia = breakdown.iter().find(|e| e.label == "IA").unwrap();
        assert!((ia.value - 21.7262).abs() < EPSILON);
    }
}
