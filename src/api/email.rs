//! Email delivery abstraction for out-of-band notifications.
//!
//! The auth handlers only depend on the pass/fail outcome of a send: a
//! password-reset request that cannot be delivered must roll back its token
//! state, so delivery happens inline rather than through a queue. The
//! `EmailSender` trait decides how to deliver (SMTP, API, etc.); the default
//! for local dev is `LogEmailSender`, which logs and returns `Ok(())`.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery abstraction used by the auth handlers.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error so the caller can roll back.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            body = %message.body,
            "email send stub"
        );
        Ok(())
    }
}
