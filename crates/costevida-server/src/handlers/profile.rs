//! Profile settings handlers

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};

use crate::{get_user, AppError, AppState};
use costevida_core::models::{Profile, ProfileUpdate};

/// GET /api/profile - Fetch profile settings
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let user = get_user(&headers);

    let profile = state.db.get_profile()?;

    state
        .db
        .log_audit(&user, "get", Some("profile"), None, None)?;

    Ok(Json(profile))
}

/// PUT /api/profile - Update profile settings
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    let user = get_user(&headers);

    let profile = state.db.update_profile(&update)?;

    state.db.log_audit(&user, "update", Some("profile"), None, None)?;

    Ok(Json(profile))
}
