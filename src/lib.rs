//! placement-portal - Campus placement coordination service
//!
//! This crate provides placement postings, eligibility-filtered email
//! notifications, application-form tracking, and resume storage with:
//! - Swappable object storage backends for resumes (local filesystem, GCS)
//! - Swappable email dispatch strategies (SMTP relay, HTTP template endpoint)
//! - redb embedded database for records (ACID, MVCC, crash-safe)
//! - REST API with token sessions and role-gated routes

pub mod api;
pub mod auth;
pub mod config;
pub mod eligibility;
pub mod mailer;
pub mod notify;
pub mod object_store;
pub mod resumes;
pub mod storage;

use std::sync::Arc;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub object_store: Arc<dyn object_store::ObjectStore>,
    pub mailer: Arc<dyn mailer::Mailer>,
}
