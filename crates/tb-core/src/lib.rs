//! tb-core: taskbell core library
//!
//! Shared configuration, error type, the task-row domain model, and the
//! service port traits implemented by the adapter crates.

pub mod config;
pub mod error;
pub mod ports;
pub mod task;

pub use config::{CalendarConfig, Config, MailConfig, ScanConfig, SchedulerConfig, SheetConfig};
pub use error::{Error, Result};
pub use ports::{CalendarStore, EventDraft, EventSummary, Mailer, OutboundEmail, SheetStore};
pub use task::TaskRow;
