use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{placement_summary, Mailer, MailerError};
use crate::config::SmtpConfig;
use crate::storage::models::{Placement, User};

/// SMTP relay dispatch strategy.
///
/// Renders a fixed HTML template per recipient and hands it to a
/// transactional relay. No retry on failure; the caller records the outcome.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    portal_login_url: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, portal_base_url: &str) -> Result<Self, MailerError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| MailerError::Address(format!("SMTP_FROM: {e}")))?;

        let transport = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
                    .map_err(|e| MailerError::Transport(e.to_string()))?
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build()
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.relay)
                .port(config.port)
                .build(),
        };

        Ok(Self {
            transport,
            from,
            portal_login_url: format!("{}/login", portal_base_url.trim_end_matches('/')),
        })
    }

    fn render_html(&self, student: &User, placement: &Placement) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1>New Placement Opportunity</h1>
    <p>Hello {name}!</p>
    <p>A new placement opportunity has been posted that matches your profile:</p>
    <div style="padding: 20px; border-left: 4px solid #667eea; margin: 20px 0;">
      <h3>{company}</h3>
      <p><strong>Position:</strong> {role}</p>
      <p><strong>Package:</strong> {package}</p>
      <p><strong>Location:</strong> {location}</p>
      <p><strong>Deadline:</strong> {deadline}</p>
      <p>{description}</p>
      <p><strong>Requirements:</strong> {requirements}</p>
    </div>
    <p>Application link: <a href="{application_link}">{application_link}</a></p>
    <p>Login to the placement portal to view full details and apply:
       <a href="{portal_link}">{portal_link}</a></p>
    <p style="color: #666; font-size: 12px;">This is an automated email. Please do not reply.</p>
  </div>
</body>
</html>"#,
            name = student.full_name,
            company = placement.company_name,
            role = placement.job_role,
            package = placement.package,
            location = placement.location,
            deadline = placement.deadline.format("%B %e, %Y"),
            description = placement.job_description,
            requirements = placement.requirements,
            application_link = placement.application_link,
            portal_link = self.portal_login_url,
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, student: &User, placement: &Placement) -> Result<(), MailerError> {
        let to: Mailbox = format!("{} <{}>", student.full_name, student.email)
            .parse()
            .map_err(|e| MailerError::Address(format!("{}: {e}", student.email)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(placement_summary(placement))
            .header(ContentType::TEXT_HTML)
            .body(self.render_html(student, placement))
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        Ok(())
    }
}
