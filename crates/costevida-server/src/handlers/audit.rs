//! Audit log handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use costevida_core::db::AuditEntry;

/// Maximum audit entries returned in one request
const MAX_AUDIT_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

/// GET /api/audit - Recent audit log entries, newest first
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, MAX_AUDIT_LIMIT);
    let entries = state.db.list_audit_log(limit)?;
    Ok(Json(entries))
}
