use chrono::{Duration, NaiveDate, Utc};
use placement_portal::storage::models::{
    ApplicationForm, EligibilityStatus, InterviewStatus, Notification, Placement, Role, Session,
    User,
};
use placement_portal::storage::{Database, PlacementUpdate};

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn sample_student(id: &str, name: &str, email: &str, department: &str) -> User {
    User {
        id: id.to_string(),
        full_name: name.to_string(),
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

fn sample_faculty(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        full_name: name.to_string(),
        email: email.to_string(),
        phone: "555-0200".to_string(),
        role: Role::Faculty,
        department: "CSE".to_string(),
        password_salt: "c2FsdA==".to_string(),
        password_hash: "aGFzaA==".to_string(),
        created_at: Utc::now(),
        student_id: None,
        year: None,
        resume_url: None,
        resume_filename: None,
        resume_updated_at: None,
        faculty_id: Some(format!("F-{id}")),
    }
}

fn sample_placement(id: &str, company: &str, departments: &[&str]) -> Placement {
    Placement {
        id: id.to_string(),
        company_name: company.to_string(),
        job_role: "Software Engineer".to_string(),
        package: "12 LPA".to_string(),
        location: "Pune".to_string(),
        deadline: Utc::now() + Duration::days(14),
        eligible_departments: departments.iter().map(|d| d.to_string()).collect(),
        job_description: "Build and ship backend services".to_string(),
        requirements: "Strong fundamentals".to_string(),
        application_link: "https://careers.example.com/apply".to_string(),
        posted_by: "faculty-1".to_string(),
        posted_by_name: "Prof. Rao".to_string(),
        posted_at: Utc::now(),
    }
}

fn sample_form(id: &str, student_id: &str, company: &str) -> ApplicationForm {
    ApplicationForm {
        id: id.to_string(),
        student_id: student_id.to_string(),
        student_name: "Asha Verma".to_string(),
        student_email: "asha@example.edu".to_string(),
        department: "CSE".to_string(),
        year: "3".to_string(),
        company_name: company.to_string(),
        position: "Backend Intern".to_string(),
        application_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        application_status: "Applied".to_string(),
        notes: None,
        submitted_at: Utc::now(),
        eligibility_status: None,
        interview_status: None,
        faculty_notes: None,
        faculty_updated_at: None,
    }
}

fn sample_notification(id: &str, user_id: &str, placement_id: &str) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_email: "asha@example.edu".to_string(),
        kind: "placement".to_string(),
        placement_id: placement_id.to_string(),
        company_name: "Acme".to_string(),
        job_role: "Software Engineer".to_string(),
        message: "New placement opportunity: Acme - Software Engineer".to_string(),
        sent_at: Utc::now(),
        read: false,
        email_sent: None,
        email_error: None,
        email_sent_at: None,
    }
}

// ============================================================================
// User tests
// ============================================================================

#[test]
fn test_put_and_get_user() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u1", "Asha Verma", "asha@example.edu", "CSE"))
        .unwrap();

    let user = db.get_user("u1").unwrap().expect("user should exist");
    assert_eq!(user.full_name, "Asha Verma");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.student_id, Some("S-u1".to_string()));
    assert_eq!(user.faculty_id, None);
}

#[test]
fn test_get_user_by_email() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u2", "Ravi Kumar", "ravi@example.edu", "ECE"))
        .unwrap();

    let user = db
        .get_user_by_email("ravi@example.edu")
        .unwrap()
        .expect("user should resolve by email");
    assert_eq!(user.id, "u2");

    assert!(db.get_user_by_email("nobody@example.edu").unwrap().is_none());
}

#[test]
fn test_email_exists() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u3", "Meera Iyer", "meera@example.edu", "CSE"))
        .unwrap();

    assert!(db.email_exists("meera@example.edu").unwrap());
    assert!(!db.email_exists("other@example.edu").unwrap());
}

#[test]
fn test_list_students_sorted_and_filtered() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u-b", "bela Shah", "bela@example.edu", "CSE"))
        .unwrap();
    db.put_user(&sample_student("u-a", "Arjun Mehta", "arjun@example.edu", "ECE"))
        .unwrap();
    db.put_user(&sample_faculty("f-1", "Prof. Rao", "rao@example.edu"))
        .unwrap();

    let students = db.list_students().unwrap();
    assert_eq!(students.len(), 2);
    // Sorted by name, case-insensitive
    assert_eq!(students[0].id, "u-a");
    assert_eq!(students[1].id, "u-b");
}

#[test]
fn test_update_profile() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u4", "Old Name", "u4@example.edu", "CSE"))
        .unwrap();

    let updated = db
        .update_profile("u4", "New Name", "555-9999", "ECE", Some("4"))
        .unwrap();
    assert!(updated);

    let user = db.get_user("u4").unwrap().unwrap();
    assert_eq!(user.full_name, "New Name");
    assert_eq!(user.phone, "555-9999");
    assert_eq!(user.department, "ECE");
    assert_eq!(user.year, Some("4".to_string()));
    // Untouched fields survive
    assert_eq!(user.email, "u4@example.edu");
    assert_eq!(user.student_id, Some("S-u4".to_string()));
}

#[test]
fn test_update_profile_not_found() {
    let (_dir, db) = test_db();
    assert!(!db
        .update_profile("missing", "Name", "555", "CSE", None)
        .unwrap());
}

#[test]
fn test_set_resume() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u5", "Asha Verma", "u5@example.edu", "CSE"))
        .unwrap();

    let now = Utc::now();
    assert!(db
        .set_resume("u5", "http://localhost:8080/resumes/u5", "cv.pdf", now)
        .unwrap());

    let user = db.get_user("u5").unwrap().unwrap();
    assert_eq!(
        user.resume_url,
        Some("http://localhost:8080/resumes/u5".to_string())
    );
    assert_eq!(user.resume_filename, Some("cv.pdf".to_string()));
    assert_eq!(user.resume_updated_at, Some(now));
}

// ============================================================================
// Session tests
// ============================================================================

#[test]
fn test_session_roundtrip() {
    let (_dir, db) = test_db();
    let session = Session {
        token: "tok-1".to_string(),
        user_id: "u1".to_string(),
        role: Role::Faculty,
        created_at: Utc::now(),
    };
    db.put_session(&session).unwrap();

    let loaded = db.get_session("tok-1").unwrap().expect("session exists");
    assert_eq!(loaded.user_id, "u1");
    assert_eq!(loaded.role, Role::Faculty);

    assert!(db.delete_session("tok-1").unwrap());
    assert!(db.get_session("tok-1").unwrap().is_none());
    assert!(!db.delete_session("tok-1").unwrap());
}

// ============================================================================
// Placement tests
// ============================================================================

#[test]
fn test_put_and_get_placement() {
    let (_dir, db) = test_db();
    db.put_placement(&sample_placement("p1", "Acme", &["CSE", "ECE"]))
        .unwrap();

    let placement = db.get_placement("p1").unwrap().expect("placement exists");
    assert_eq!(placement.company_name, "Acme");
    assert_eq!(placement.eligible_departments, vec!["CSE", "ECE"]);
}

#[test]
fn test_list_placements_newest_first() {
    let (_dir, db) = test_db();
    let mut older = sample_placement("p-old", "OldCo", &["All"]);
    older.posted_at = Utc::now() - Duration::hours(2);
    let mut newer = sample_placement("p-new", "NewCo", &["All"]);
    newer.posted_at = Utc::now();

    db.put_placement(&older).unwrap();
    db.put_placement(&newer).unwrap();

    let placements = db.list_placements().unwrap();
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].id, "p-new");
    assert_eq!(placements[1].id, "p-old");
}

#[test]
fn test_update_placement_preserves_poster() {
    let (_dir, db) = test_db();
    let placement = sample_placement("p2", "Acme", &["CSE"]);
    let posted_at = placement.posted_at;
    db.put_placement(&placement).unwrap();

    let new_deadline = Utc::now() + Duration::days(30);
    let updated = db
        .update_placement(
            "p2",
            &PlacementUpdate {
                company_name: "Acme Corp".to_string(),
                job_role: "SRE".to_string(),
                package: "15 LPA".to_string(),
                location: "Remote".to_string(),
                deadline: new_deadline,
                eligible_departments: vec!["CSE".to_string(), "All".to_string()],
                job_description: "Keep the lights on".to_string(),
                requirements: "Linux".to_string(),
                application_link: "https://careers.example.com/sre".to_string(),
            },
        )
        .unwrap();
    assert!(updated);

    let placement = db.get_placement("p2").unwrap().unwrap();
    assert_eq!(placement.company_name, "Acme Corp");
    assert_eq!(placement.job_role, "SRE");
    assert_eq!(placement.deadline, new_deadline);
    // Poster identity and posting time are immutable
    assert_eq!(placement.posted_by, "faculty-1");
    assert_eq!(placement.posted_by_name, "Prof. Rao");
    assert_eq!(placement.posted_at, posted_at);
}

#[test]
fn test_update_placement_not_found() {
    let (_dir, db) = test_db();
    let update = PlacementUpdate {
        company_name: "X".to_string(),
        job_role: "Y".to_string(),
        package: "1".to_string(),
        location: "Z".to_string(),
        deadline: Utc::now(),
        eligible_departments: vec!["All".to_string()],
        job_description: String::new(),
        requirements: String::new(),
        application_link: String::new(),
    };
    assert!(!db.update_placement("missing", &update).unwrap());
}

#[test]
fn test_delete_placement_tolerates_double_delete() {
    let (_dir, db) = test_db();
    db.put_placement(&sample_placement("p3", "Acme", &["All"]))
        .unwrap();

    assert!(db.delete_placement("p3").unwrap());
    // Second delete is a no-op, not an error — concurrent sweeps race here
    assert!(!db.delete_placement("p3").unwrap());
    assert!(db.get_placement("p3").unwrap().is_none());
}

// ============================================================================
// Notification tests
// ============================================================================

#[test]
fn test_put_notification_and_recipient_index() {
    let (_dir, db) = test_db();
    db.put_notification(&sample_notification("n1", "u1", "p1"))
        .unwrap();
    db.put_notification(&sample_notification("n2", "u1", "p2"))
        .unwrap();
    db.put_notification(&sample_notification("n3", "u2", "p1"))
        .unwrap();

    let for_u1 = db.notifications_for_user("u1").unwrap();
    assert_eq!(for_u1.len(), 2);
    let for_u2 = db.notifications_for_user("u2").unwrap();
    assert_eq!(for_u2.len(), 1);
    assert_eq!(for_u2[0].id, "n3");

    assert!(db.notifications_for_user("u3").unwrap().is_empty());
}

#[test]
fn test_notifications_newest_first() {
    let (_dir, db) = test_db();
    let mut older = sample_notification("n-old", "u1", "p1");
    older.sent_at = Utc::now() - Duration::minutes(5);
    let mut newer = sample_notification("n-new", "u1", "p2");
    newer.sent_at = Utc::now();

    db.put_notification(&older).unwrap();
    db.put_notification(&newer).unwrap();

    let notifications = db.notifications_for_user("u1").unwrap();
    assert_eq!(notifications[0].id, "n-new");
    assert_eq!(notifications[1].id, "n-old");
}

#[test]
fn test_record_email_outcome() {
    let (_dir, db) = test_db();
    db.put_notification(&sample_notification("n4", "u1", "p1"))
        .unwrap();

    let at = Utc::now();
    assert!(db
        .record_email_outcome("n4", false, Some("relay refused"), at)
        .unwrap());

    let notification = db.get_notification("n4").unwrap().unwrap();
    assert_eq!(notification.email_sent, Some(false));
    assert_eq!(notification.email_error, Some("relay refused".to_string()));
    assert_eq!(notification.email_sent_at, Some(at));
    // The rest of the record is untouched
    assert!(!notification.read);
    assert_eq!(notification.placement_id, "p1");

    assert!(!db
        .record_email_outcome("missing", true, None, Utc::now())
        .unwrap());
}

// ============================================================================
// Application form tests
// ============================================================================

#[test]
fn test_put_and_get_form() {
    let (_dir, db) = test_db();
    db.put_form(&sample_form("f1", "u1", "Acme")).unwrap();

    let form = db.get_form("f1").unwrap().expect("form exists");
    assert_eq!(form.company_name, "Acme");
    assert_eq!(form.application_status, "Applied");
    assert_eq!(form.eligibility_status, None);
    assert_eq!(form.interview_status, None);
}

#[test]
fn test_forms_for_student_newest_first() {
    let (_dir, db) = test_db();
    let mut older = sample_form("f-old", "u1", "OldCo");
    older.submitted_at = Utc::now() - Duration::hours(1);
    let mut newer = sample_form("f-new", "u1", "NewCo");
    newer.submitted_at = Utc::now();
    db.put_form(&older).unwrap();
    db.put_form(&newer).unwrap();
    db.put_form(&sample_form("f-other", "u2", "Acme")).unwrap();

    let forms = db.forms_for_student("u1").unwrap();
    assert_eq!(forms.len(), 2);
    assert_eq!(forms[0].id, "f-new");
    assert_eq!(forms[1].id, "f-old");
}

#[test]
fn test_list_forms_with_company_filter() {
    let (_dir, db) = test_db();
    db.put_form(&sample_form("f2", "u1", "Acme")).unwrap();
    db.put_form(&sample_form("f3", "u2", "Globex")).unwrap();

    let all = db.list_forms(None).unwrap();
    assert_eq!(all.len(), 2);

    let acme = db.list_forms(Some("Acme")).unwrap();
    assert_eq!(acme.len(), 1);
    assert_eq!(acme[0].id, "f2");

    assert!(db.list_forms(Some("Initech")).unwrap().is_empty());
}

#[test]
fn test_faculty_fields_settable_in_any_order() {
    let (_dir, db) = test_db();
    db.put_form(&sample_form("f4", "u1", "Acme")).unwrap();

    // Interview verdict lands before any eligibility verdict — allowed
    assert!(db
        .set_form_interview_status("f4", InterviewStatus::Selected, Utc::now())
        .unwrap());
    let form = db.get_form("f4").unwrap().unwrap();
    assert_eq!(form.interview_status, Some(InterviewStatus::Selected));
    assert_eq!(form.eligibility_status, None);

    assert!(db
        .set_form_eligibility("f4", EligibilityStatus::Eligible, Utc::now())
        .unwrap());
    assert!(db
        .set_form_faculty_notes("f4", "Good fundamentals, polish the resume", Utc::now())
        .unwrap());

    let form = db.get_form("f4").unwrap().unwrap();
    assert_eq!(form.eligibility_status, Some(EligibilityStatus::Eligible));
    assert_eq!(form.interview_status, Some(InterviewStatus::Selected));
    assert_eq!(
        form.faculty_notes,
        Some("Good fundamentals, polish the resume".to_string())
    );
}

#[test]
fn test_faculty_fields_last_write_wins_and_idempotent() {
    let (_dir, db) = test_db();
    db.put_form(&sample_form("f5", "u1", "Acme")).unwrap();

    db.set_form_eligibility("f5", EligibilityStatus::Eligible, Utc::now())
        .unwrap();
    db.set_form_eligibility("f5", EligibilityStatus::NotEligible, Utc::now())
        .unwrap();
    // Repeating the same value changes nothing and creates no extra record
    db.set_form_eligibility("f5", EligibilityStatus::NotEligible, Utc::now())
        .unwrap();

    let form = db.get_form("f5").unwrap().unwrap();
    assert_eq!(form.eligibility_status, Some(EligibilityStatus::NotEligible));
    assert_eq!(db.forms_for_student("u1").unwrap().len(), 1);
}

#[test]
fn test_faculty_updates_leave_student_fields_untouched() {
    let (_dir, db) = test_db();
    db.put_form(&sample_form("f6", "u1", "Acme")).unwrap();

    db.set_form_interview_status("f6", InterviewStatus::Rejected, Utc::now())
        .unwrap();

    let form = db.get_form("f6").unwrap().unwrap();
    assert_eq!(form.student_id, "u1");
    assert_eq!(form.student_name, "Asha Verma");
    assert_eq!(form.company_name, "Acme");
    assert_eq!(form.application_status, "Applied");
    assert!(form.faculty_updated_at.is_some());
}

#[test]
fn test_form_mutations_not_found() {
    let (_dir, db) = test_db();
    assert!(!db
        .set_form_eligibility("missing", EligibilityStatus::Eligible, Utc::now())
        .unwrap());
    assert!(!db
        .set_form_interview_status("missing", InterviewStatus::Pending, Utc::now())
        .unwrap());
    assert!(!db
        .set_form_faculty_notes("missing", "notes", Utc::now())
        .unwrap());
}

// ============================================================================
// Purge tests
// ============================================================================

#[test]
fn test_purge_all() {
    let (_dir, db) = test_db();
    db.put_user(&sample_student("u1", "Asha Verma", "asha@example.edu", "CSE"))
        .unwrap();
    db.put_placement(&sample_placement("p1", "Acme", &["All"]))
        .unwrap();
    db.put_notification(&sample_notification("n1", "u1", "p1"))
        .unwrap();
    db.put_form(&sample_form("f1", "u1", "Acme")).unwrap();

    let stats = db.purge_all().unwrap();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.placements, 1);
    assert_eq!(stats.notifications, 1);
    assert_eq!(stats.forms, 1);

    assert!(db.get_user("u1").unwrap().is_none());
    assert!(!db.email_exists("asha@example.edu").unwrap());
    assert!(db.list_placements().unwrap().is_empty());
    assert!(db.notifications_for_user("u1").unwrap().is_empty());
    assert!(db.forms_for_student("u1").unwrap().is_empty());
}
