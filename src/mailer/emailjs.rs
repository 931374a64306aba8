use async_trait::async_trait;
use reqwest::Client;

use super::{Mailer, MailerError};
use crate::config::EmailJsConfig;
use crate::storage::models::{Placement, User};

/// HTTP template-dispatch strategy (EmailJS-style endpoint).
///
/// The template lives with the provider; this side only supplies the named
/// parameter set. A non-2xx response is a failed send.
pub struct EmailJsMailer {
    client: Client,
    api_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
    portal_login_url: String,
}

impl EmailJsMailer {
    pub fn new(config: &EmailJsConfig, portal_base_url: &str) -> Result<Self, MailerError> {
        let client = Client::builder()
            .build()
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
            portal_login_url: format!("{}/login", portal_base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Mailer for EmailJsMailer {
    async fn send(&self, student: &User, placement: &Placement) -> Result<(), MailerError> {
        let body = serde_json::json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": {
                "to_email": student.email,
                "to_name": student.full_name,
                "company_name": placement.company_name,
                "job_role": placement.job_role,
                "package": placement.package,
                "location": placement.location,
                "deadline": placement.deadline.format("%B %e, %Y").to_string(),
                "job_description": placement.job_description,
                "requirements": placement.requirements,
                "application_link": placement.application_link,
                "portal_link": self.portal_login_url,
            },
        });

        let resp = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(MailerError::Endpoint(format!(
                "dispatch failed ({status}): {body}"
            )));
        }

        Ok(())
    }
}
