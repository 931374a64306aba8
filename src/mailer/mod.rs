mod emailjs;
mod smtp;

pub use emailjs::EmailJsMailer;
pub use smtp::SmtpMailer;

use async_trait::async_trait;
use thiserror::Error;

use crate::storage::models::{Placement, User};

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid address: {0}")]
    Address(String),
    #[error("Message build error: {0}")]
    Message(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Dispatch endpoint error: {0}")]
    Endpoint(String),
}

/// Abstraction over email dispatch strategies.
/// Rendering and transport are strategy-internal; callers see only
/// success-or-failure per recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, student: &User, placement: &Placement) -> Result<(), MailerError>;
}

/// One-line summary used as the notification message and email subject body.
pub fn placement_summary(placement: &Placement) -> String {
    format!(
        "New placement opportunity: {} - {}",
        placement.company_name, placement.job_role
    )
}
