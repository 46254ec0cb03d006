//! Error types for tb-calendar

use thiserror::Error;

/// tb-calendar error type
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("CalDAV error: {0}")]
    CaldavError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("XML parsing error: {0}")]
    XmlParseError(String),

    #[error("Create error: {0}")]
    CreateError(String),
}

impl From<CalendarError> for tb_core::Error {
    fn from(e: CalendarError) -> Self {
        tb_core::Error::Calendar(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CalendarError>;
