use bytes::Bytes;
use chrono::Utc;
use placement_portal::object_store::{LocalStore, ObjectStore};
use placement_portal::resumes;
use placement_portal::storage::models::{Role, User};
use placement_portal::storage::Database;

const BASE_URL: &str = "http://localhost:8080";

fn fixtures() -> (tempfile::TempDir, Database, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    let store = LocalStore::new(dir.path().join("files")).unwrap();
    (dir, db, store)
}

fn student(id: &str) -> User {
    User {
        id: id.to_string(),
        full_name: "Asha Verma".to_string(),
        email: format!("{id}@example.edu"),
        phone: "555-0100".to_string(),
        role: Role::Student,
        department: "CSE".to_string(),
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

#[tokio::test]
async fn test_first_upload_stores_file_and_records_url() {
    let (_dir, db, store) = fixtures();
    db.put_user(&student("u1")).unwrap();

    let url = resumes::replace_resume(
        &db,
        &store,
        "u1",
        "cv.pdf",
        Bytes::from("%PDF-1.4 first"),
        BASE_URL,
    )
    .await
    .unwrap();

    assert_eq!(url, "http://localhost:8080/resumes/u1");

    let keys = store.list("resumes/u1/").await.unwrap();
    assert_eq!(keys, vec!["resumes/u1/cv.pdf".to_string()]);

    let user = db.get_user("u1").unwrap().unwrap();
    assert_eq!(user.resume_url, Some(url));
    assert_eq!(user.resume_filename, Some("cv.pdf".to_string()));
    assert!(user.resume_updated_at.is_some());
}

#[tokio::test]
async fn test_second_upload_replaces_first() {
    let (_dir, db, store) = fixtures();
    db.put_user(&student("u2")).unwrap();

    resumes::replace_resume(
        &db,
        &store,
        "u2",
        "resume-v1.pdf",
        Bytes::from("%PDF-1.4 version one"),
        BASE_URL,
    )
    .await
    .unwrap();

    resumes::replace_resume(
        &db,
        &store,
        "u2",
        "resume-v2.pdf",
        Bytes::from("%PDF-1.4 version two"),
        BASE_URL,
    )
    .await
    .unwrap();

    // Exactly one object remains in the student's folder, and it is the new one
    let keys = store.list("resumes/u2/").await.unwrap();
    assert_eq!(keys, vec!["resumes/u2/resume-v2.pdf".to_string()]);

    let data = store.get("resumes/u2/resume-v2.pdf").await.unwrap();
    assert_eq!(data, Bytes::from("%PDF-1.4 version two"));

    let user = db.get_user("u2").unwrap().unwrap();
    assert_eq!(user.resume_filename, Some("resume-v2.pdf".to_string()));
}

#[tokio::test]
async fn test_replace_with_same_filename_overwrites() {
    let (_dir, db, store) = fixtures();
    db.put_user(&student("u3")).unwrap();

    resumes::replace_resume(&db, &store, "u3", "cv.pdf", Bytes::from("old"), BASE_URL)
        .await
        .unwrap();
    resumes::replace_resume(&db, &store, "u3", "cv.pdf", Bytes::from("new"), BASE_URL)
        .await
        .unwrap();

    let keys = store.list("resumes/u3/").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(store.get("resumes/u3/cv.pdf").await.unwrap(), Bytes::from("new"));
}

#[tokio::test]
async fn test_uploads_are_isolated_per_student() {
    let (_dir, db, store) = fixtures();
    db.put_user(&student("u4")).unwrap();
    db.put_user(&student("u5")).unwrap();

    resumes::replace_resume(&db, &store, "u4", "a.pdf", Bytes::from("a"), BASE_URL)
        .await
        .unwrap();
    resumes::replace_resume(&db, &store, "u5", "b.pdf", Bytes::from("b"), BASE_URL)
        .await
        .unwrap();

    // Replacing u4's resume must not touch u5's folder
    resumes::replace_resume(&db, &store, "u4", "a2.pdf", Bytes::from("a2"), BASE_URL)
        .await
        .unwrap();

    assert_eq!(
        store.list("resumes/u5/").await.unwrap(),
        vec!["resumes/u5/b.pdf".to_string()]
    );
}

#[tokio::test]
async fn test_upload_for_unknown_user_fails() {
    let (_dir, db, store) = fixtures();

    let result = resumes::replace_resume(
        &db,
        &store,
        "ghost",
        "cv.pdf",
        Bytes::from("data"),
        BASE_URL,
    )
    .await;

    assert!(matches!(
        result,
        Err(placement_portal::resumes::ResumeError::UserNotFound(_))
    ));
}
