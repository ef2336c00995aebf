pub mod resend;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EmailConfig;

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug)]
pub struct MailError {
    pub message: String,
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for MailError {
    fn from(s: String) -> Self {
        MailError { message: s }
    }
}

impl From<&str> for MailError {
    fn from(s: &str) -> Self {
        MailError {
            message: s.to_string(),
        }
    }
}

/// A delivery backend. The portal only ever sends transactional mail, one
/// message per call.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, MailError> {
        let transport: Arc<dyn MailTransport> = match config {
            EmailConfig::Resend(resend) => Arc::new(resend::ResendTransport::new(resend)?),
            EmailConfig::Smtp(smtp) => Arc::new(smtp::SmtpTransport::new(smtp)?),
        };
        Ok(Self::new(transport))
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    pub async fn send_invite(
        &self,
        to_email: &str,
        link: &str,
        ttl_hours: i64,
    ) -> Result<(), MailError> {
        let (html, text) = templates::render_invite(link, ttl_hours);
        self.send(to_email, "You're invited to the Career Portal", html, text)
            .await
    }

    pub async fn send_password_reset(
        &self,
        to_email: &str,
        link: &str,
        ttl_hours: i64,
    ) -> Result<(), MailError> {
        let (html, text) = templates::render_password_reset(link, ttl_hours);
        self.send(to_email, "Reset your Career Portal password", html, text)
            .await
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: String,
        text: String,
    ) -> Result<(), MailError> {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html,
            text,
        };
        self.transport.send(&email).await
    }
}
