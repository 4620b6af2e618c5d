use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::validation::{UploadedFile, ValidatedContact};

const SMTP_PORT: u16 = 587;

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Failed to create email message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Invalid attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("Failed to send email via SMTP: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Seam between the request handlers and outbound email, so tests can
/// observe whether a submission reached the notifier at all.
pub trait ContactNotifier: Send + Sync {
    fn send_contact_notification(
        &self,
        contact: &ValidatedContact,
        files: &[UploadedFile],
    ) -> Result<(), NotifierError>;
}

struct SmtpConfig {
    server: String,
    username: String,
    password: String,
    admin_email: String,
}

/// Outbound email for accepted contact submissions. Sends are best-effort:
/// the caller never rolls back a persisted submission because a send failed.
pub struct Notifier {
    config: Option<SmtpConfig>,
}

impl Notifier {
    /// Reads SMTP_SERVER, SMTP_USERNAME, SMTP_PASSWORD and ADMIN_EMAIL.
    /// With any of them missing the notifier runs disabled and sends are
    /// logged no-ops.
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("SMTP_SERVER"),
            std::env::var("SMTP_USERNAME"),
            std::env::var("SMTP_PASSWORD"),
            std::env::var("ADMIN_EMAIL"),
        ) {
            (Ok(server), Ok(username), Ok(password), Ok(admin_email)) => Some(SmtpConfig {
                server,
                username,
                password,
                admin_email,
            }),
            _ => None,
        };
        Self { config }
    }

    pub fn disabled() -> Self {
        Self { config: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }
}

impl ContactNotifier for Notifier {
    /// One email to the admin recipient per accepted contact submission,
    /// with every accepted file inlined as a binary attachment.
    fn send_contact_notification(
        &self,
        contact: &ValidatedContact,
        files: &[UploadedFile],
    ) -> Result<(), NotifierError> {
        let Some(config) = &self.config else {
            tracing::debug!("SMTP not configured, skipping contact notification");
            return Ok(());
        };

        let body_text = format!(
            "New contact form submission\n\n\
             Name: {}\n\
             Email: {}\n\
             Contact type: {}\n\
             Subject: {}\n\n\
             Project details:\n{}\n",
            contact.full_name,
            contact.email,
            contact.contact_type,
            contact.subject,
            contact.project_details,
        );

        let mut body = MultiPart::mixed().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(body_text),
        );
        for file in files {
            let content_type = ContentType::parse(&file.content_type)?;
            body = body.singlepart(
                Attachment::new(file.name.clone()).body(file.data.to_vec(), content_type),
            );
        }

        let email_message = Message::builder()
            .from(config.username.parse()?)
            .to(config.admin_email.parse()?)
            .subject(format!("New Contact Form Submission: {}", contact.subject))
            .multipart(body)?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = SmtpTransport::starttls_relay(&config.server)?
            .port(SMTP_PORT)
            .credentials(creds)
            .build();

        mailer.send(&email_message)?;
        tracing::info!("Contact notification email sent");
        Ok(())
    }
}
