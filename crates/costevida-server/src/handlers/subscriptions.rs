//! Subscription CRUD handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::{get_user, AppError, AppState, SuccessResponse};
use costevida_core::db::SubscriptionFilter;
use costevida_core::models::{BillingCycle, Subscription, SubscriptionInput, SubscriptionStatus};

/// Query params for listing subscriptions
#[derive(Debug, Deserialize, Default)]
pub struct ListSubscriptionsQuery {
    /// Filter by status; omitted or "all" means every status
    pub status: Option<String>,
    /// Filter by billing cycle
    pub billing: Option<String>,
    /// Filter by category (substring match)
    pub category: Option<String>,
    /// Filter by vendor (exact match)
    pub vendor: Option<String>,
    /// Search by tool name (substring match)
    pub q: Option<String>,
}

impl ListSubscriptionsQuery {
    /// Resolve the raw query strings into a typed filter
    ///
    /// `default_status` is applied when the `status` param is absent; the
    /// literal "all" always disables the status condition.
    pub fn to_filter(
        &self,
        default_status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionFilter<'_>, AppError> {
        let status = match self.status.as_deref() {
            None => default_status,
            Some("all") => None,
            Some(s) => Some(
                s.parse::<SubscriptionStatus>()
                    .map_err(|e| AppError::bad_request(&e))?,
            ),
        };

        let billing = self
            .billing
            .as_deref()
            .map(|s| s.parse::<BillingCycle>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;

        Ok(SubscriptionFilter::new()
            .status(status)
            .billing(billing)
            .category(self.category.as_deref())
            .vendor(self.vendor.as_deref())
            .search(self.q.as_deref()))
    }
}

/// GET /api/subscriptions - List subscriptions with optional filters
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSubscriptionsQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let user = get_user(&headers);

    // The list view shows every status unless one is requested
    let filter = query.to_filter(None)?;
    let subscriptions = state.db.list_subscriptions(filter)?;

    state.db.log_audit(
        &user,
        "list",
        Some("subscription"),
        None,
        Some(&format!("count={}", subscriptions.len())),
    )?;

    Ok(Json(subscriptions))
}

/// POST /api/subscriptions - Create a subscription
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<SubscriptionInput>,
) -> Result<Json<Subscription>, AppError> {
    let user = get_user(&headers);

    let created = state.db.create_subscription(&input)?;

    state.db.log_audit(
        &user,
        "create",
        Some("subscription"),
        Some(created.id),
        Some(&created.tool_name),
    )?;

    Ok(Json(created))
}

/// GET /api/subscriptions/:id - Fetch a single subscription
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Subscription>, AppError> {
    let user = get_user(&headers);

    let subscription = state
        .db
        .get_subscription(id)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("subscription"), Some(id), None)?;

    Ok(Json(subscription))
}

/// PUT /api/subscriptions/:id - Replace a subscription
pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<SubscriptionInput>,
) -> Result<Json<Subscription>, AppError> {
    let user = get_user(&headers);

    let updated = state
        .db
        .update_subscription(id, &input)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    state
        .db
        .log_audit(&user, "update", Some("subscription"), Some(id), None)?;

    Ok(Json(updated))
}

/// DELETE /api/subscriptions/:id - Delete a subscription and its payments
pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = get_user(&headers);

    if !state.db.delete_subscription(id)? {
        return Err(AppError::not_found(&format!(
            "Subscription {} not found",
            id
        )));
    }

    state
        .db
        .log_audit(&user, "delete", Some("subscription"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
