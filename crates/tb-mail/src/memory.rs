//! In-memory mailer fake for tests

use async_trait::async_trait;
use std::sync::Mutex;

use tb_core::{Error, Mailer, OutboundEmail};

/// In-memory `Mailer` recording everything it is asked to send.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_sends: Mutex<bool>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail.
    pub fn fail_sends(&self) {
        *self.fail_sends.lock().unwrap() = true;
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutboundEmail) -> tb_core::Result<()> {
        if *self.fail_sends.lock().unwrap() {
            return Err(Error::Mail("injected send failure".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            to: "ana@example.com".to_string(),
            subject: "hi".to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_sends() {
        let mailer = MemoryMailer::new();
        mailer.send(&email()).await.unwrap();
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, "ana@example.com");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mailer = MemoryMailer::new();
        mailer.fail_sends();
        assert!(mailer.send(&email()).await.is_err());
        assert!(mailer.sent().is_empty());
    }
}
