use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::api::session::SessionUser;
use crate::storage::models::Notification;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub placement_id: String,
    pub company_name: String,
    pub job_role: String,
    pub message: String,
    pub sent_at: String,
    pub read: bool,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
) -> Result<Json<JSend<Vec<NotificationResponse>>>, ApiError> {
    session.require_student()?;

    let notifications = state
        .db
        .notifications_for_user(&session.user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(
        notifications.iter().map(notification_to_response).collect(),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

fn notification_to_response(notification: &Notification) -> NotificationResponse {
    NotificationResponse {
        id: notification.id.clone(),
        kind: notification.kind.clone(),
        placement_id: notification.placement_id.clone(),
        company_name: notification.company_name.clone(),
        job_role: notification.job_role.clone(),
        message: notification.message.clone(),
        sent_at: notification.sent_at.to_rfc3339(),
        read: notification.read,
    }
}
