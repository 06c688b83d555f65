//! Account notification mail.
//!
//! The [`Mailer`] trait is the seam between the account flow and mail
//! delivery: the SMTP implementation renders an embedded template per
//! account event and hands the message to lettre, while the recording and
//! no-op implementations back tests and mail-disabled deployments.

use async_trait::async_trait;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use shelfmark_config::MailConfig;
use std::sync::Mutex;
use tera::Tera;
use thiserror::Error;
use tracing::{error, info};

pub mod templates;

pub use templates::AccountEmail;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail configuration error: {0}")]
    Configuration(String),

    #[error("invalid mail address: {0}")]
    Address(String),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Sends account notification mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Render the template for `email` and deliver it to `to`, addressing
    /// the recipient as `name`.
    async fn send(&self, to: &str, name: &str, email: AccountEmail) -> Result<(), MailerError>;
}

/// SMTP-backed mailer rendering the embedded templates
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    config: MailConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration
    pub fn new(config: MailConfig) -> Result<Self, MailerError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailerError::Configuration(format!("failed to configure SMTP relay: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            templates: templates::build_templates()?,
            config,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, name: &str, email: AccountEmail) -> Result<(), MailerError> {
        let context = templates::context_for(name, &self.config.from_name);

        let text_body = self
            .templates
            .render(&email.text_template(), &context)
            .map_err(|e| MailerError::Template(e.to_string()))?;
        let html_body = self
            .templates
            .render(&email.html_template(), &context)
            .map_err(|e| MailerError::Template(e.to_string()))?;

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_address)
                    .parse()
                    .map_err(|e| MailerError::Configuration(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| MailerError::Address(format!("invalid recipient {to}: {e}")))?)
            .subject(email.subject())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| MailerError::Template(format!("failed to build message: {e}")))?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!(to, subject = email.subject(), "account mail sent");
                Ok(())
            }
            Err(e) => {
                error!(to, subject = email.subject(), error = %e, "account mail delivery failed");
                Err(MailerError::Delivery(e.to_string()))
            }
        }
    }
}

/// Mailer used when mail is disabled: logs the event and succeeds
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, _name: &str, email: AccountEmail) -> Result<(), MailerError> {
        info!(to, subject = email.subject(), "mail disabled, skipped account mail");
        Ok(())
    }
}

/// A message captured by [`RecordingMailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub name: String,
    pub subject: String,
}

/// Test mailer that records every send and can be told to fail
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail with a delivery error
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, name: &str, email: AccountEmail) -> Result<(), MailerError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(MailerError::Delivery(message));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            name: name.to_string(),
            subject: email.subject().to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_mailer_captures_sends() {
        let mailer = RecordingMailer::new();
        mailer
            .send("a@x.com", "Jane", AccountEmail::Created)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "account created");
    }

    #[tokio::test]
    async fn recording_mailer_can_be_told_to_fail() {
        let mailer = RecordingMailer::new();
        mailer.fail_with("smtp unreachable");

        let result = mailer.send("a@x.com", "Jane", AccountEmail::Created).await;
        assert!(matches!(result, Err(MailerError::Delivery(message)) if message == "smtp unreachable"));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn noop_mailer_always_succeeds() {
        NoopMailer
            .send("a@x.com", "Jane", AccountEmail::Deleted)
            .await
            .unwrap();
    }
}
