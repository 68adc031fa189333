//! Payment history handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::{get_user, AppError, AppState};
use costevida_core::models::{PaymentInput, SubscriptionPayment};

/// GET /api/subscriptions/:id/payments - Payment history, most recent first
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<SubscriptionPayment>>, AppError> {
    let user = get_user(&headers);

    // Distinguish "no payments yet" from "no such subscription"
    state
        .db
        .get_subscription(id)?
        .ok_or_else(|| AppError::not_found(&format!("Subscription {} not found", id)))?;

    let payments = state.db.list_payments(id)?;

    state.db.log_audit(
        &user,
        "list",
        Some("payment"),
        Some(id),
        Some(&format!("count={}", payments.len())),
    )?;

    Ok(Json(payments))
}

/// POST /api/subscriptions/:id/payments - Record a payment
pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<PaymentInput>,
) -> Result<Json<SubscriptionPayment>, AppError> {
    let user = get_user(&headers);

    let payment = state.db.record_payment(id, &input)?;

    state.db.log_audit(
        &user,
        "record_payment",
        Some("subscription"),
        Some(id),
        Some(&format!("amount={}", payment.amount)),
    )?;

    Ok(Json(payment))
}
