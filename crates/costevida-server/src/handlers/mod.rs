//! HTTP request handlers organized by domain

pub mod audit;
pub mod dashboard;
pub mod payments;
pub mod profile;
pub mod subscriptions;

// Re-export all handlers for use in the router
pub use audit::*;
pub use dashboard::*;
pub use payments::*;
pub use profile::*;
pub use subscriptions::*;

use axum::Json;

/// GET /api/health - liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
