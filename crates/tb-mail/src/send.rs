//! Reminder mail delivery via SMTP
//!
//! Real delivery requires the `smtp` feature (lettre). Without it the
//! sender only logs what it would have sent, which keeps local runs and
//! CI free of SMTP credentials.

use async_trait::async_trait;
use tracing::info;

use tb_core::{MailConfig, Mailer, OutboundEmail};

use crate::error::Result;

/// Production mail sender.
#[derive(Debug, Clone)]
pub struct EmailSender {
    config: MailConfig,
}

impl EmailSender {
    /// Create a new email sender.
    pub fn new(config: MailConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// From header: `Name <addr>` when a display name is configured.
    fn from_header(&self) -> String {
        match &self.config.from_name {
            Some(name) => format!("{} <{}>", name, self.config.from_address),
            None => self.config.from_address.clone(),
        }
    }

    #[cfg(feature = "smtp")]
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        use crate::error::MailError;
        use lettre::message::Mailbox;
        use lettre::transport::smtp::authentication::Credentials;
        use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

        let from: Mailbox = self
            .from_header()
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", self.config.from_address, e)))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", email.to, e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|e| MailError::SmtpSend(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| MailError::SmtpConfig(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_pass.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| MailError::SmtpSend(e.to_string()))?;
        Ok(())
    }

    #[cfg(not(feature = "smtp"))]
    async fn deliver(&self, email: &OutboundEmail) -> Result<()> {
        info!(
            "smtp feature disabled, would send: from={}, to={}, subject={}",
            self.from_header(),
            email.to,
            email.subject
        );
        Ok(())
    }

    /// Send one email through the configured relay.
    pub async fn send(&self, email: &OutboundEmail) -> Result<()> {
        info!(
            "Sending email to {} via {}:{}",
            email.to, self.config.smtp_host, self.config.smtp_port
        );
        self.deliver(email).await
    }
}

#[async_trait]
impl Mailer for EmailSender {
    async fn send(&self, email: &OutboundEmail) -> tb_core::Result<()> {
        Ok(EmailSender::send(self, email).await?)
    }
}
