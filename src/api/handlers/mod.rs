mod admin;
mod auth;
mod forms;
mod notifications;
mod placements;
mod users;

pub use admin::{admin_purge, health};
pub use auth::{login, logout, register};
pub use forms::{
    list_forms, set_eligibility, set_faculty_notes, set_interview_status, submit_form,
};
pub use notifications::list_notifications;
pub use placements::{create_placement, delete_placement, list_placements, update_placement};
pub use users::{
    get_profile, get_student, list_students, serve_resume, update_profile, upload_resume,
};
