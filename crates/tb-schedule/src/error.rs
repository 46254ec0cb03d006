//! Error types for tb-schedule

use thiserror::Error;

/// tb-schedule error type
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Cron error: {0}")]
    Cron(#[from] cron::error::Error),

    #[error("Core error: {0}")]
    Core(#[from] tb_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScheduleError>;
