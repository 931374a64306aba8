use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Stored on the user record and on every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }
}

/// A user record stored in redb.
///
/// Role-specific fields are optional: `student_id`/`year`/resume fields are
/// set for students, `faculty_id` for faculty. The password fields hold a
/// base64 salt and PBKDF2 output, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: String,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub resume_filename: Option<String>,
    #[serde(default)]
    pub resume_updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub faculty_id: Option<String>,
}

/// A login session: opaque token -> (subject, role).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Department list sentinel meaning "every department is eligible".
pub const ALL_DEPARTMENTS: &str = "All";

/// A placement posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub company_name: String,
    pub job_role: String,
    pub package: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
    /// Non-empty; may contain the `All` sentinel.
    pub eligible_departments: Vec<String>,
    pub job_description: String,
    pub requirements: String,
    pub application_link: String,
    pub posted_by: String,
    pub posted_by_name: String,
    pub posted_at: DateTime<Utc>,
}

/// A per-student notification written by placement fan-out.
///
/// The email outcome fields start unset and are filled in once by the
/// dispatch adapter; nothing else ever mutates the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub kind: String,
    pub placement_id: String,
    pub company_name: String,
    pub job_role: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,

    #[serde(default)]
    pub email_sent: Option<bool>,
    #[serde(default)]
    pub email_error: Option<String>,
    #[serde(default)]
    pub email_sent_at: Option<DateTime<Utc>>,
}

/// Faculty verdict on whether an applicant meets the posting's criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityStatus {
    Eligible,
    NotEligible,
}

/// Faculty verdict on the interview outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Selected,
    Rejected,
    Pending,
}

/// Application-status labels a student may pick at submission.
pub const APPLICATION_STATUSES: &[&str] = &[
    "Applied",
    "Under Review",
    "Interview Scheduled",
    "Rejected",
    "Selected",
];

/// An application form submitted by a student.
///
/// Student-identity fields are frozen at submission; only the faculty-owned
/// status fields and notes mutate afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationForm {
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
    #[serde(default)]
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,

    #[serde(default)]
    pub eligibility_status: Option<EligibilityStatus>,
    #[serde(default)]
    pub interview_status: Option<InterviewStatus>,
    #[serde(default)]
    pub faculty_notes: Option<String>,
    #[serde(default)]
    pub faculty_updated_at: Option<DateTime<Utc>>,
}
