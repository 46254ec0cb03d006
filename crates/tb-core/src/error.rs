//! Error types for tb-core

use thiserror::Error;

/// Main error type for tb-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Row parse error: {0}")]
    RowParse(String),

    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tb-core
pub type Result<T> = std::result::Result<T, Error>;
