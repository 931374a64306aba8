use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    let mut router = Router::new()
        // Accounts & sessions
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        // Profiles
        .route("/users/me", get(handlers::get_profile))
        .route("/users/me", put(handlers::update_profile))
        .route(
            "/users/me/resume",
            post(handlers::upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/resumes/:user_id", get(handlers::serve_resume))
        // Faculty views of students
        .route("/students", get(handlers::list_students))
        .route("/students/:id", get(handlers::get_student))
        // Placement catalog
        .route("/placements", get(handlers::list_placements))
        .route("/placements", post(handlers::create_placement))
        .route("/placements/:id", put(handlers::update_placement))
        .route("/placements/:id", delete(handlers::delete_placement))
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        // Application forms
        .route("/forms", get(handlers::list_forms))
        .route("/forms", post(handlers::submit_form))
        .route("/forms/:id/eligibility", put(handlers::set_eligibility))
        .route("/forms/:id/interview", put(handlers::set_interview_status))
        .route("/forms/:id/notes", put(handlers::set_faculty_notes))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled — purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
