//! Dashboard handler
//!
//! Fetches the matching subscriptions once and runs the pure aggregation
//! functions over them. Nothing here is cached; every request recomputes
//! from the current rows. Amounts are summed without currency conversion.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use super::subscriptions::ListSubscriptionsQuery;
use crate::{get_user, AppError, AppState};
use costevida_core::models::{BreakdownEntry, Kpis, SubscriptionStatus};
use costevida_core::normalize::{calculate_kpis, category_breakdown, vendor_breakdown};

/// Dashboard payload: KPI cards plus chart data
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub kpis: Kpis,
    /// Spend by category, sorted descending (pie chart)
    pub category_breakdown: Vec<BreakdownEntry>,
    /// Top 5 vendors by spend, sorted descending (bar chart)
    pub vendor_breakdown: Vec<BreakdownEntry>,
}

/// GET /api/dashboard - Aggregate spend metrics
///
/// Accepts the same filters as the list endpoint, but defaults `status` to
/// `active` the way the dashboard view does (pass `status=all` to widen).
/// Note the KPIs only ever count active rows within the fetched set, while
/// the breakdowns include every fetched row regardless of status.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSubscriptionsQuery>,
    headers: HeaderMap,
) -> Result<Json<DashboardSummary>, AppError> {
    let user = get_user(&headers);

    let filter = query.to_filter(Some(SubscriptionStatus::Active))?;
    let subscriptions = state.db.list_subscriptions(filter)?;

    let summary = DashboardSummary {
        kpis: calculate_kpis(&subscriptions),
        category_breakdown: category_breakdown(&subscriptions),
        vendor_breakdown: vendor_breakdown(&subscriptions),
    };

    state.db.log_audit(
        &user,
        "dashboard",
        None,
        None,
        Some(&format!("subscriptions={}", subscriptions.len())),
    )?;

    Ok(Json(summary))
}
