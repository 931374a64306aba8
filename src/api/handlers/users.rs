use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::forms::{form_to_response, FormResponse};
use crate::api::response::{ApiError, AppJson, JSend};
use crate::api::session::SessionUser;
use crate::resumes;
use crate::storage::models::{Role, User};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: String,
    pub department: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub resume_url: String,
    pub resume_filename: String,
}

#[derive(Debug, Serialize)]
pub struct StudentDetailResponse {
    pub student: UserResponse,
    pub applications: Vec<FormResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    let user = state
        .db
        .get_user(&session.user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(JSend::success(user_to_response(&user)))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<JSend<UserResponse>>, ApiError> {
    if req.full_name.trim().is_empty() {
        return Err(ApiError::bad_request("Full name must not be empty"));
    }
    if req.department.trim().is_empty() {
        return Err(ApiError::bad_request("Department must not be empty"));
    }

    let updated = state
        .db
        .update_profile(
            &session.user_id,
            &req.full_name,
            &req.phone,
            &req.department,
            req.year.as_deref(),
        )
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !updated {
        return Err(ApiError::not_found("User not found"));
    }

    let user = state
        .db
        .get_user(&session.user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("User not found after update"))?;

    tracing::debug!(user_id = %session.user_id, "Updated profile");
    Ok(JSend::success(user_to_response(&user)))
}

pub async fn upload_resume(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    mut multipart: Multipart,
) -> Result<Json<JSend<ResumeUploadResponse>>, ApiError> {
    session.require_student()?;

    let mut file_data: Option<bytes::Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut file_content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        if field.name().unwrap_or("") == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_content_type = field.content_type().map(|s| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

            if data.len() as u64 > state.config.max_upload_size {
                return Err(ApiError::payload_too_large(format!(
                    "File exceeds maximum upload size of {} bytes",
                    state.config.max_upload_size
                )));
            }

            file_data = Some(data);
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::bad_request("file field is required"))?;

    // Reject non-PDF uploads before touching the object store
    let mime_type = file_content_type.or_else(|| {
        file_name
            .as_deref()
            .and_then(|n| mime_guess::from_path(n).first())
            .map(|m| m.to_string())
    });
    if mime_type.as_deref() != Some("application/pdf") {
        return Err(ApiError::bad_request("Please upload a PDF file only."));
    }

    // Strip any path components a client smuggled into the filename
    let filename = file_name
        .as_deref()
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .filter(|n| !n.is_empty())
        .unwrap_or("resume.pdf")
        .to_string();

    let resume_url = resumes::replace_resume(
        &state.db,
        state.object_store.as_ref(),
        &session.user_id,
        &filename,
        file_data,
        &state.config.portal_base_url,
    )
    .await
    .map_err(|e| ApiError::internal(format!("Failed to store resume: {e}")))?;

    tracing::debug!(user_id = %session.user_id, %filename, "Replaced resume");
    Ok(JSend::success(ResumeUploadResponse {
        resume_url,
        resume_filename: filename,
    }))
}

/// Serve resume content by student id.
/// Route: GET /resumes/:user_id
pub async fn serve_resume(
    State(state): State<Arc<AppState>>,
    _session: SessionUser,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let user = state
        .db
        .get_user(&user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let filename = user
        .resume_filename
        .as_deref()
        .ok_or_else(|| ApiError::not_found("No resume uploaded"))?;

    let key = resumes::object_key(&user_id, filename);
    let data = state.object_store.get(&key).await.map_err(|e| match e {
        crate::object_store::ObjectStoreError::NotFound(_) => {
            ApiError::not_found("Resume content not found")
        }
        _ => ApiError::internal(format!("Failed to retrieve resume: {e}")),
    })?;

    let byte_size = data.len() as u64;
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_LENGTH, header::HeaderValue::from(byte_size));
    if let Ok(value) = format!("inline; filename=\"{filename}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
) -> Result<Json<JSend<Vec<UserResponse>>>, ApiError> {
    session.require_faculty()?;

    let students = state
        .db
        .list_students()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(
        students.iter().map(user_to_response).collect(),
    ))
}

pub async fn get_student(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<StudentDetailResponse>>, ApiError> {
    session.require_faculty()?;

    let student = state
        .db
        .get_user(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .filter(|u| u.role == Role::Student)
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let forms = state
        .db
        .forms_for_student(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(StudentDetailResponse {
        student: user_to_response(&student),
        applications: forms.iter().map(form_to_response).collect(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn user_to_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        role: user.role,
        department: user.department.clone(),
        created_at: user.created_at.to_rfc3339(),
        student_id: user.student_id.clone(),
        year: user.year.clone(),
        resume_url: user.resume_url.clone(),
        resume_filename: user.resume_filename.clone(),
        faculty_id: user.faculty_id.clone(),
    }
}
