use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub users_deleted: u64,
    pub placements_deleted: u64,
    pub notifications_deleted: u64,
    pub forms_deleted: u64,
    pub sessions_deleted: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<JSend<HealthResponse>> {
    JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<PurgeResponse>>, ApiError> {
    let stats = state
        .db
        .purge_all()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::warn!(
        users = stats.users,
        placements = stats.placements,
        notifications = stats.notifications,
        forms = stats.forms,
        "Purged all data"
    );

    Ok(JSend::success(PurgeResponse {
        users_deleted: stats.users,
        placements_deleted: stats.placements,
        notifications_deleted: stats.notifications,
        forms_deleted: stats.forms,
        sessions_deleted: stats.sessions,
    }))
}
