use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::users::{user_to_response, UserResponse};
use crate::api::response::{ApiError, AppJson, JSend};
use crate::auth;
use crate::storage::models::{Role, Session, User};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub role: Role,
    pub department: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub faculty_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    // Synchronous validation before any store write
    if req.password != req.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters long",
        ));
    }
    if req.full_name.trim().is_empty() {
        return Err(ApiError::bad_request("Full name must not be empty"));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if req.department.trim().is_empty() {
        return Err(ApiError::bad_request("Department must not be empty"));
    }
    match req.role {
        Role::Student => {
            if req.student_id.as_deref().unwrap_or("").trim().is_empty() {
                return Err(ApiError::bad_request("Student ID is required"));
            }
            if req.year.as_deref().unwrap_or("").trim().is_empty() {
                return Err(ApiError::bad_request("Year is required"));
            }
        }
        Role::Faculty => {
            if req.faculty_id.as_deref().unwrap_or("").trim().is_empty() {
                return Err(ApiError::bad_request("Faculty ID is required"));
            }
        }
    }

    if state
        .db
        .email_exists(&req.email)
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict(
            "This email is already registered. Please login instead.",
        ));
    }

    let credentials = auth::hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        full_name: req.full_name,
        email: req.email,
        phone: req.phone,
        role: req.role,
        department: req.department,
        password_salt: credentials.salt,
        password_hash: credentials.hash,
        created_at: Utc::now(),
        student_id: match req.role {
            Role::Student => req.student_id,
            Role::Faculty => None,
        },
        year: match req.role {
            Role::Student => req.year,
            Role::Faculty => None,
        },
        resume_url: None,
        resume_filename: None,
        resume_updated_at: None,
        faculty_id: match req.role {
            Role::Faculty => req.faculty_id,
            Role::Student => None,
        },
    };

    state
        .db
        .put_user(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(user_id = %user.id, role = %user.role.as_str(), "Registered user");
    Ok(JSend::success(user_to_response(&user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<JSend<LoginResponse>>, ApiError> {
    let user = state
        .db
        .get_user_by_email(&req.email)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("No account found with this email."))?;

    if !auth::verify_password(&req.password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::unauthorized("Incorrect password."));
    }

    if user.role != req.role {
        return Err(ApiError::forbidden(format!(
            "This account is registered as {}. Please select the correct role.",
            user.role.as_str()
        )));
    }

    let session = Session {
        token: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        role: user.role,
        created_at: Utc::now(),
    };
    state
        .db
        .put_session(&session)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(user_id = %user.id, "Logged in");
    Ok(JSend::success(LoginResponse {
        token: session.token,
        user: user_to_response(&user),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<JSend<()>>, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing authorization token"))?;

    // Logging out an already-dead session is fine
    state
        .db
        .delete_session(token)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(()))
}
