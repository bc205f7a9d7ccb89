//! Port for outbound verification email.
//!
//! Delivery is fire-and-forget from the caller's perspective: registration
//! succeeds even when the send fails, and the failure is only logged.

use async_trait::async_trait;

use crate::domain::Email;

/// Errors raised by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The message could not be handed to the delivery channel.
    #[error("verification email send failed: {message}")]
    Send { message: String },
}

impl MailerError {
    /// Create a send error with the given message.
    pub fn send(message: impl Into<String>) -> Self {
        Self::Send {
            message: message.into(),
        }
    }
}

/// Port for dispatching verification email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Send the verification token to the given address.
    ///
    /// `token` is the plaintext token; only its digest is persisted.
    async fn send_verification(&self, email: &Email, token: &str) -> Result<(), MailerError>;
}

/// Fixture implementation that swallows messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVerificationMailer;

#[async_trait]
impl VerificationMailer for FixtureVerificationMailer {
    async fn send_verification(&self, _email: &Email, _token: &str) -> Result<(), MailerError> {
        Ok(())
    }
}
