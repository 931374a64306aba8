use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::api::session::SessionUser;
use crate::eligibility;
use crate::notify::{self, FanOutReport};
use crate::storage::models::{Placement, Role};
use crate::storage::PlacementUpdate;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePlacementRequest {
    pub company_name: String,
    pub job_role: String,
    pub package: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    pub eligible_departments: Vec<String>,
    pub job_description: String,
    pub requirements: String,
    pub application_link: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlacementRequest {
    pub company_name: String,
    pub job_role: String,
    pub package: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    pub eligible_departments: Vec<String>,
    pub job_description: String,
    pub requirements: String,
    pub application_link: String,
}

#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    pub id: String,
    pub company_name: String,
    pub job_role: String,
    pub package: String,
    pub location: String,
    pub deadline: String,
    pub eligible_departments: Vec<String>,
    pub job_description: String,
    pub requirements: String,
    pub application_link: String,
    pub posted_by: String,
    pub posted_by_name: String,
    pub posted_at: String,
    /// Present in student listings: whether the caller's department matches.
    /// Ineligible postings are still listed, so clients can show them
    /// read-only with an explanatory badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CreatePlacementResponse {
    pub placement: PlacementResponse,
    pub emails: FanOutReport,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_placement(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    AppJson(req): AppJson<CreatePlacementRequest>,
) -> Result<Json<JSend<CreatePlacementResponse>>, ApiError> {
    session.require_faculty()?;
    validate_departments(&req.eligible_departments)?;
    if req.company_name.trim().is_empty() {
        return Err(ApiError::bad_request("Company name must not be empty"));
    }

    let poster = state
        .db
        .get_user(&session.user_id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Session user not found"))?;

    let placement = Placement {
        id: uuid::Uuid::new_v4().to_string(),
        company_name: req.company_name,
        job_role: req.job_role,
        package: req.package,
        location: req.location,
        deadline: req.deadline,
        eligible_departments: req.eligible_departments,
        job_description: req.job_description,
        requirements: req.requirements,
        application_link: req.application_link,
        posted_by: poster.id.clone(),
        posted_by_name: poster.full_name.clone(),
        posted_at: Utc::now(),
    };

    state
        .db
        .put_placement(&placement)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(placement_id = %placement.id, company = %placement.company_name, "Created placement");

    // Notify eligible students. A fan-out that dies on a store error leaves
    // the posting in place; the poster sees zero counts.
    let send_delay = Duration::from_millis(state.config.email_send_delay_ms);
    let emails = match notify::notify_eligible_students(
        &state.db,
        state.mailer.as_ref(),
        &placement,
        send_delay,
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(placement_id = %placement.id, error = %e, "Notification fan-out aborted");
            FanOutReport::default()
        }
    };

    Ok(JSend::success(CreatePlacementResponse {
        placement: placement_to_response(&placement, None),
        emails,
    }))
}

pub async fn list_placements(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
) -> Result<Json<JSend<Vec<PlacementResponse>>>, ApiError> {
    let placements = state
        .db
        .list_placements()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    // Expiry sweep: listing deletes passed-deadline postings as a side
    // effect. A concurrent listing may win the race; the no-op delete is
    // tolerated.
    let now = Utc::now();
    let mut live = Vec::new();
    for placement in placements {
        if placement.deadline < now {
            match state.db.delete_placement(&placement.id) {
                Ok(true) => {
                    tracing::debug!(placement_id = %placement.id, company = %placement.company_name, "Removed expired placement")
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(placement_id = %placement.id, error = %e, "Failed to remove expired placement")
                }
            }
            continue;
        }
        live.push(placement);
    }

    // Students see every live posting annotated with their own eligibility
    let department = match session.role {
        Role::Student => {
            let user = state
                .db
                .get_user(&session.user_id)
                .map_err(|e| ApiError::internal(e.to_string()))?
                .ok_or_else(|| ApiError::internal("Session user not found"))?;
            Some(user.department)
        }
        Role::Faculty => None,
    };

    let items = live
        .iter()
        .map(|p| {
            let eligible = department
                .as_deref()
                .map(|d| eligibility::is_eligible(&p.eligible_departments, d));
            placement_to_response(p, eligible)
        })
        .collect();

    Ok(JSend::success(items))
}

pub async fn update_placement(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdatePlacementRequest>,
) -> Result<Json<JSend<PlacementResponse>>, ApiError> {
    session.require_faculty()?;
    validate_departments(&req.eligible_departments)?;

    let update = PlacementUpdate {
        company_name: req.company_name,
        job_role: req.job_role,
        package: req.package,
        location: req.location,
        deadline: req.deadline,
        eligible_departments: req.eligible_departments,
        job_description: req.job_description,
        requirements: req.requirements,
        application_link: req.application_link,
    };

    let updated = state
        .db
        .update_placement(&id, &update)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !updated {
        return Err(ApiError::not_found("Placement not found"));
    }

    let placement = state
        .db
        .get_placement(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Placement not found after update"))?;

    tracing::debug!(placement_id = %id, "Updated placement");
    Ok(JSend::success(placement_to_response(&placement, None)))
}

pub async fn delete_placement(
    State(state): State<Arc<AppState>>,
    session: SessionUser,
    Path(id): Path<String>,
) -> Result<Json<JSend<()>>, ApiError> {
    session.require_faculty()?;

    let deleted = state
        .db
        .delete_placement(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !deleted {
        return Err(ApiError::not_found("Placement not found"));
    }

    tracing::debug!(placement_id = %id, "Deleted placement");
    Ok(JSend::success(()))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_departments(eligible_departments: &[String]) -> Result<(), ApiError> {
    if eligible_departments.is_empty() {
        return Err(ApiError::bad_request(
            "eligible_departments must not be empty",
        ));
    }
    if eligible_departments.iter().any(|d| d.trim().is_empty()) {
        return Err(ApiError::bad_request(
            "eligible_departments must not contain empty entries",
        ));
    }
    Ok(())
}

fn placement_to_response(placement: &Placement, eligible: Option<bool>) -> PlacementResponse {
    PlacementResponse {
        id: placement.id.clone(),
        company_name: placement.company_name.clone(),
        job_role: placement.job_role.clone(),
        package: placement.package.clone(),
        location: placement.location.clone(),
        deadline: placement.deadline.to_rfc3339(),
        eligible_departments: placement.eligible_departments.clone(),
        job_description: placement.job_description.clone(),
        requirements: placement.requirements.clone(),
        application_link: placement.application_link.clone(),
        posted_by: placement.posted_by.clone(),
        posted_by_name: placement.posted_by_name.clone(),
        posted_at: placement.posted_at.to_rfc3339(),
        eligible,
    }
}
