//! Error types for tb-mail

use thiserror::Error;

/// tb-mail error type
#[derive(Error, Debug)]
pub enum MailError {
    #[error("SMTP configuration error: {0}")]
    SmtpConfig(String),

    #[error("SMTP send error: {0}")]
    SmtpSend(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

impl From<MailError> for tb_core::Error {
    fn from(e: MailError) -> Self {
        tb_core::Error::Mail(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MailError>;
