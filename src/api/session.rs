//! Session guard: resolves a bearer token to the caller's identity and role.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;

use crate::api::response::ApiError;
use crate::storage::models::Role;
use crate::AppState;

/// The authenticated caller: subject identifier plus role.
/// Extraction fails with 401 when the token is missing or unknown; role
/// checks are per-handler via the `require_*` helpers (403).
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub role: Role,
}

impl SessionUser {
    pub fn require_student(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Student => Ok(()),
            Role::Faculty => Err(ApiError::forbidden("This action requires a student account")),
        }
    }

    pub fn require_faculty(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Faculty => Ok(()),
            Role::Student => Err(ApiError::forbidden("This action requires a faculty account")),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing authorization token — please login"))?;

        let session = state
            .db
            .get_session(token)
            .map_err(|e| ApiError::internal(e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized("Session is invalid or expired — please login"))?;

        Ok(SessionUser {
            user_id: session.user_id,
            role: session.role,
        })
    }
}
