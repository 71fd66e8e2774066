//! Outgoing mail. Delivery is pluggable; the server logs messages and tests
//! capture them in memory.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()>;
}

/// Writes every message to the log instead of delivering it.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
        info!(to = %message.to, subject = %message.subject, body = %message.body, "mail queued");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<MailMessage> {
        self.sent().into_iter().rev().find(|message| message.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("mailbox poisoned"))?
            .push(message);
        Ok(())
    }
}

pub fn verification_mail(to: &str, name: &str, code: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Verify your email".to_string(),
        body: format!(
            "Hello {name},\n\nYour verification code is {code}. It expires in 5 minutes."
        ),
    }
}

pub fn welcome_mail(to: &str, name: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Welcome to EMS".to_string(),
        body: format!("Hello {name},\n\nYour email address has been verified."),
    }
}

pub fn reset_mail(to: &str, link: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        body: format!("Use the link below within one hour to choose a new password:\n\n{link}"),
    }
}

pub fn reset_confirmation_mail(to: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Password changed".to_string(),
        body: "Your password was reset successfully.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_mailer_keeps_messages_in_order() {
        let mailer = MemoryMailer::new();
        mailer
            .send(verification_mail("a@acme.test", "Ann", "123456"))
            .await
            .unwrap();
        mailer.send(welcome_mail("a@acme.test", "Ann")).await.unwrap();
        assert_eq!(mailer.sent().len(), 2);
        let last = mailer.last_to("a@acme.test").unwrap();
        assert_eq!(last.subject, "Welcome to EMS");
        assert!(mailer.last_to("b@acme.test").is_none());
    }
}
