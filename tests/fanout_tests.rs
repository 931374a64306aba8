use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use placement_portal::mailer::{Mailer, MailerError};
use placement_portal::notify::notify_eligible_students;
use placement_portal::storage::models::{Placement, Role, User};
use placement_portal::storage::Database;

/// Mailer double that records recipients and fails for chosen addresses.
struct RecordingMailer {
    sent_to: Mutex<Vec<String>>,
    fail_for: Vec<String>,
}

impl RecordingMailer {
    fn new() -> Self {
        Self {
            sent_to: Mutex::new(Vec::new()),
            fail_for: Vec::new(),
        }
    }

    fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent_to: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn recipients(&self) -> Vec<String> {
        self.sent_to.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, student: &User, _placement: &Placement) -> Result<(), MailerError> {
        if self.fail_for.contains(&student.email) {
            return Err(MailerError::Transport("connection refused".to_string()));
        }
        self.sent_to.lock().unwrap().push(student.email.clone());
        Ok(())
    }
}

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn student(id: &str, email: &str, department: &str) -> User {
    User {
        id: id.to_string(),
        full_name: format!("Student {id}"),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        role: Role::Student,
        department: department.to_string(),
        password_salt: "c2FsdA==".to_string(),
        password_hash: "aGFzaA==".to_string(),
        created_at: Utc::now(),
        student_id: Some(format!("S-{id}")),
        year: Some("3".to_string()),
        resume_url: None,
        resume_filename: None,
        resume_updated_at: None,
        faculty_id: None,
    }
}

fn placement(departments: &[&str]) -> Placement {
    Placement {
        id: "p1".to_string(),
        company_name: "Acme".to_string(),
        job_role: "Software Engineer".to_string(),
        package: "12 LPA".to_string(),
        location: "Pune".to_string(),
        deadline: Utc::now() + TimeDelta::days(7),
        eligible_departments: departments.iter().map(|d| d.to_string()).collect(),
        job_description: "Build backend services".to_string(),
        requirements: "Strong fundamentals".to_string(),
        application_link: "https://careers.example.com/apply".to_string(),
        posted_by: "faculty-1".to_string(),
        posted_by_name: "Prof. Rao".to_string(),
        posted_at: Utc::now(),
    }
}

const NO_DELAY: Duration = Duration::ZERO;

#[tokio::test]
async fn test_fanout_notifies_each_eligible_student_once() {
    let (_dir, db) = test_db();
    db.put_user(&student("s1", "s1@example.edu", "CSE")).unwrap();
    db.put_user(&student("s2", "s2@example.edu", "ECE")).unwrap();
    db.put_user(&student("s3", "s3@example.edu", "CSE")).unwrap();

    let mailer = RecordingMailer::new();
    let placement = placement(&["CSE"]);
    let report = notify_eligible_students(&db, &mailer, &placement, NO_DELAY)
        .await
        .unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(mailer.recipients().len(), 2);

    // Exactly one notification per eligible student, none for the rest
    let notifications = db.notifications_for_placement("p1").unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.user_id != "s2"));
    assert!(notifications.iter().all(|n| !n.read));
    assert!(notifications.iter().all(|n| n.email_sent == Some(true)));
}

#[tokio::test]
async fn test_fanout_all_sentinel_reaches_every_department() {
    let (_dir, db) = test_db();
    db.put_user(&student("s1", "s1@example.edu", "CSE")).unwrap();
    db.put_user(&student("s2", "s2@example.edu", "ECE")).unwrap();
    db.put_user(&student("s3", "s3@example.edu", "MECH"))
        .unwrap();

    let mailer = RecordingMailer::new();
    let placement = placement(&["CSE", "All"]);
    let report = notify_eligible_students(&db, &mailer, &placement, NO_DELAY)
        .await
        .unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(db.notifications_for_placement("p1").unwrap().len(), 3);
}

#[tokio::test]
async fn test_fanout_failure_does_not_abort_remaining_students() {
    let (_dir, db) = test_db();
    db.put_user(&student("s1", "a@example.edu", "CSE")).unwrap();
    db.put_user(&student("s2", "b@example.edu", "CSE")).unwrap();
    db.put_user(&student("s3", "c@example.edu", "CSE")).unwrap();

    // Students are processed in name order; the middle one fails
    let mailer = RecordingMailer::failing_for(&["b@example.edu"]);
    let placement = placement(&["CSE"]);
    let report = notify_eligible_students(&db, &mailer, &placement, NO_DELAY)
        .await
        .unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.sent + report.failed, 3);

    // The failed student still got a notification record, with the outcome
    let notifications = db.notifications_for_placement("p1").unwrap();
    assert_eq!(notifications.len(), 3);
    let failed = notifications
        .iter()
        .find(|n| n.user_email == "b@example.edu")
        .expect("failed student has a record");
    assert_eq!(failed.email_sent, Some(false));
    assert!(failed
        .email_error
        .as_deref()
        .is_some_and(|e| e.contains("connection refused")));
}

#[tokio::test]
async fn test_fanout_with_no_eligible_students() {
    let (_dir, db) = test_db();
    db.put_user(&student("s1", "s1@example.edu", "MECH"))
        .unwrap();

    let mailer = RecordingMailer::new();
    let placement = placement(&["CSE"]);
    let report = notify_eligible_students(&db, &mailer, &placement, NO_DELAY)
        .await
        .unwrap();

    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 0);
    assert!(mailer.recipients().is_empty());
    assert!(db.notifications_for_placement("p1").unwrap().is_empty());
}

#[tokio::test]
async fn test_fanout_notification_content() {
    let (_dir, db) = test_db();
    db.put_user(&student("s1", "s1@example.edu", "CSE")).unwrap();

    let mailer = RecordingMailer::new();
    let placement = placement(&["CSE"]);
    notify_eligible_students(&db, &mailer, &placement, NO_DELAY)
        .await
        .unwrap();

    let notifications = db.notifications_for_user("s1").unwrap();
    assert_eq!(notifications.len(), 1);
    let notification = &notifications[0];
    assert_eq!(notification.kind, "placement");
    assert_eq!(notification.placement_id, "p1");
    assert_eq!(notification.user_email, "s1@example.edu");
    assert_eq!(notification.company_name, "Acme");
    assert_eq!(
        notification.message,
        "New placement opportunity: Acme - Software Engineer"
    );
}
