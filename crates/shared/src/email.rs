//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. When SMTP is not configured the
//! service degrades gracefully: password-reset delivery reports
//! `delivered = false` and the caller falls back to returning the reset
//! link directly.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::warn;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns true when the SMTP transport is fully configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Creates an SMTP transport. Requires `is_configured()`.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let host = self
            .config
            .smtp_host
            .as_deref()
            .ok_or_else(|| EmailError::SendError("SMTP host not configured".to_string()))?;
        let username = self.config.smtp_username.clone().unwrap_or_default();
        let password = self.config.smtp_password.clone().unwrap_or_default();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(transport)
    }

    /// Sends a password-reset email.
    ///
    /// Returns `Ok(false)` without sending when the SMTP transport is not
    /// configured; the caller is expected to surface the reset link some
    /// other way.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is configured but the send fails.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        reset_url: &str,
    ) -> Result<bool, EmailError> {
        if !self.is_configured() {
            warn!("Email configuration incomplete, skipping password reset email");
            return Ok(false);
        }

        let subject = "Reset your BudgetMate password";
        let body = format!(
            r"Hello,

You requested to reset your password. Open the link below to choose a new password:

{reset_url}

This link will expire in 30 minutes. If you did not request this change, you can safely ignore this email."
        );

        self.send_email(to_email, subject, &body).await?;
        Ok(true)
    }

    /// Sends a generic plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from_email = self.config.from_email.as_deref().unwrap_or_default();
        let from = format!("{} <{}>", self.config.from_name, from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_service_reports_not_delivered() {
        let service = EmailService::new(EmailConfig::default());
        let delivered = service
            .send_password_reset("user@example.com", "http://localhost/reset/abc")
            .await
            .unwrap();
        assert!(!delivered);
    }

    #[test]
    fn test_is_configured_reflects_config() {
        let service = EmailService::new(EmailConfig::default());
        assert!(!service.is_configured());
    }
}
