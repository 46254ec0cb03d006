//! Error types for tb-sheets

use thiserror::Error;

/// tb-sheets error type
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Values API error: {0}")]
    ValuesApi(String),

    #[error("Response parse error: {0}")]
    ParseError(String),
}

impl From<SheetError> for tb_core::Error {
    fn from(e: SheetError) -> Self {
        tb_core::Error::Sheet(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SheetError>;
