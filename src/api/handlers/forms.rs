use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, AppQuery, JSend};
use crate::api::session::SessionUser;
use crate::storage::models::{
    ApplicationForm, EligibilityStatus, InterviewStatus, Role, APPLICATION_STATUSES,
};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitFormRequest {
    pub company_name: String,
    pub position: String,
    pub application_date: NaiveDate,
    pub application_status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListFormsParams {
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetEligibilityRequest {
    pub status: EligibilityStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetInterviewRequest {
    pub status: InterviewStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetNotesRequest {
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub department: String,
    pub year: String,
    pub company_name: String,
    pub position: String,
    pub application_date: NaiveDate,
    pub application_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub submitted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility_status: Option<EligibilityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_status: Option<InterviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_updated_at: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    AppJson(req): AppJson<SubmitFormRequest>,
) -> Result<Json<JSend<FormResponse>>, ApiError> {
    session.require_student()?;

    if req.company_name.trim().is_empty() {
        return Err(ApiError::bad_request("Company name must not be empty"));
    }
    if req.position.trim().is_empty() {
        return Err(ApiError::bad_request("Position must not be empty"));
    }
    if !APPLICATION_STATUSES.contains(&req.application_status.as_str()) {
        return Err(ApiError::bad_request(format!(
            "application_status must be one of: {}",
            APPLICATION_STATUSES.join(", ")
        )));
    }

    let student = state
        .db
        .get_user(&session.user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Session user not found"))?;

    // Student-identity fields are copied from the user record and frozen
    let form = ApplicationForm {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: student.id.clone(),
        student_name: student.full_name.clone(),
        student_email: student.email.clone(),
        department: student.department.clone(),
        year: student.year.clone().unwrap_or_default(),
        company_name: req.company_name,
        position: req.position,
        application_date: req.application_date,
        application_status: req.application_status,
        notes: req.notes,
        submitted_at: Utc::now(),
        eligibility_status: None,
        interview_status: None,
        faculty_notes: None,
        faculty_updated_at: None,
    };

    state
        .db
        .put_form(&form)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(form_id = %form.id, student_id = %form.student_id, "Submitted application form");
    Ok(JSend::success(form_to_response(&form)))
}

pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    AppQuery(params): AppQuery<ListFormsParams>,
) -> Result<Json<JSend<Vec<FormResponse>>>, ApiError> {
    let forms = match session.role {
        // Students see only their own submissions
        Role::Student => state
            .db
            .forms_for_student(&session.user_id)
            .map_err(|e| ApiError::internal(e.to_string()))?,
        Role::Faculty => state
            .db
            .list_forms(params.company.as_deref())
            .map_err(|e| ApiError::internal(e.to_string()))?,
    };

    Ok(JSend::success(forms.iter().map(form_to_response).collect()))
}

pub async fn set_eligibility(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<SetEligibilityRequest>,
) -> Result<Json<JSend<FormResponse>>, ApiError> {
    session.require_faculty()?;

    let updated = state
        .db
        .set_form_eligibility(&id, req.status, Utc::now())
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !updated {
        return Err(ApiError::not_found("Application form not found"));
    }

    tracing::debug!(form_id = %id, status = ?req.status, "Updated eligibility status");
    fetch_form(&state, &id)
}

pub async fn set_interview_status(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<SetInterviewRequest>,
) -> Result<Json<JSend<FormResponse>>, ApiError> {
    session.require_faculty()?;

    let updated = state
        .db
        .set_form_interview_status(&id, req.status, Utc::now())
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !updated {
        return Err(ApiError::not_found("Application form not found"));
    }

    tracing::debug!(form_id = %id, status = ?req.status, "Updated interview status");
    fetch_form(&state, &id)
}

pub async fn set_faculty_notes(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<SetNotesRequest>,
) -> Result<Json<JSend<FormResponse>>, ApiError> {
    session.require_faculty()?;

    let updated = state
        .db
        .set_form_faculty_notes(&id, &req.notes, Utc::now())
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !updated {
        return Err(ApiError::not_found("Application form not found"));
    }

    tracing::debug!(form_id = %id, "Updated faculty notes");
    fetch_form(&state, &id)
}

// ============================================================================
// Helpers
// ============================================================================

fn fetch_form(state: &AppState, id: &str) -> Result<Json<JSend<FormResponse>>, ApiError> {
    let form = state
        .db
        .get_form(id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Application form not found after update"))?;

    Ok(JSend::success(form_to_response(&form)))
}

pub fn form_to_response(form: &ApplicationForm) -> FormResponse {
    FormResponse {
        id: form.id.clone(),
        student_id: form.student_id.clone(),
        student_name: form.student_name.clone(),
        student_email: form.student_email.clone(),
        department: form.department.clone(),
        year: form.year.clone(),
        company_name: form.company_name.clone(),
        position: form.position.clone(),
        application_date: form.application_date,
        application_status: form.application_status.clone(),
        notes: form.notes.clone(),
        submitted_at: form.submitted_at.to_rfc3339(),
        eligibility_status: form.eligibility_status,
        interview_status: form.interview_status,
        faculty_notes: form.faculty_notes.clone(),
        faculty_updated_at: form.faculty_updated_at.map(|t| t.to_rfc3339()),
    }
}
