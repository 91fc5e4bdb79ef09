//! Outgoing transactional mail.

use crate::config::EmailConfig;
use crate::database::models::Meeting;
use crate::errors::{ServiceError, ServiceResult};
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::str::FromStr;

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ServiceError::validation(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    /// Notifies a client that a meeting was scheduled on their project.
    pub async fn send_meeting_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        meeting: &Meeting,
    ) -> ServiceResult<()> {
        let subject = format!("Meeting scheduled: {}", meeting.title);
        let when = meeting.scheduled_at.format("%Y-%m-%d %H:%M UTC");
        let location = meeting.location.as_deref().unwrap_or("to be confirmed");

        let html_content = format!(
            "<p>Hi {recipient_name},</p>\
             <p>A meeting has been scheduled for your project.</p>\
             <p><strong>{}</strong><br>{when}<br>Location: {location}</p>",
            meeting.title
        );
        let text_content = format!(
            "Hi {recipient_name},\n\nA meeting has been scheduled for your project.\n\n\
             {}\n{when}\nLocation: {location}\n",
            meeting.title
        );

        self.send_email(recipient_email, &subject, &html_content, &text_content)
            .await
    }

    /// Sends a generic email
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> ServiceResult<()> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| ServiceError::validation(format!("Invalid from email: {e}")))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| ServiceError::validation(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_content.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_content.to_string()),
                    ),
            )
            .map_err(|e| ServiceError::validation(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ServiceError::external_service(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}
