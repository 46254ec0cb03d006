//! tb-schedule: reminder scan and daily trigger for taskbell
//!
//! The scan walks the task sheet once: reminder emails at the configured
//! day offsets, plus a best-effort deduplicated calendar event per open
//! task. The scheduler fires the scan once a day at a configured time.

pub mod error;
pub mod scan;
pub mod scheduler;

pub use error::{Result, ScheduleError};
pub use scan::{ReminderScan, ScanReport};
pub use scheduler::{Scheduler, SchedulerHandle};
