//! Resume storage with replace semantics.
//!
//! Each student owns one logical folder in the object store holding at most
//! one file. Uploading deletes everything under the folder before storing
//! the new file, then records the resulting URL on the user record.

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::{Database, DatabaseError};

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Object store error: {0}")]
    Store(#[from] ObjectStoreError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Folder prefix for a student's resume objects
pub fn folder_prefix(user_id: &str) -> String {
    format!("resumes/{user_id}/")
}

/// Object key for a stored resume file
pub fn object_key(user_id: &str, filename: &str) -> String {
    format!("resumes/{user_id}/{filename}")
}

/// Public URL the service serves the resume back from
pub fn resume_url(portal_base_url: &str, user_id: &str) -> String {
    format!("{}/resumes/{user_id}", portal_base_url.trim_end_matches('/'))
}

/// Replace a student's stored resume: delete every object under the
/// student's folder, store the new file, record the URL and filename.
///
/// Deletion of stale objects is best-effort; a failed delete is logged and
/// the upload continues, matching the rest of the system's
/// no-compensation policy.
pub async fn replace_resume(
    db: &Database,
    store: &dyn ObjectStore,
    user_id: &str,
    filename: &str,
    data: Bytes,
    portal_base_url: &str,
) -> Result<String, ResumeError> {
    let prefix = folder_prefix(user_id);
    match store.list(&prefix).await {
        Ok(existing) => {
            for key in existing {
                if let Err(e) = store.delete(&key).await {
                    warn!(%key, error = %e, "Failed to delete old resume object");
                }
            }
        }
        Err(e) => {
            warn!(user_id, error = %e, "Failed to list old resume objects");
        }
    }

    let key = object_key(user_id, filename);
    store.put(&key, data).await?;

    let url = resume_url(portal_base_url, user_id);
    let updated = db.set_resume(user_id, &url, filename, Utc::now())?;
    if !updated {
        return Err(ResumeError::UserNotFound(user_id.to_string()));
    }

    Ok(url)
}
