//! tb-calendar: calendar adapter for taskbell
//!
//! Provides the production CalDAV client and an in-memory fake for tests.
//! Both implement `tb_core::CalendarStore`: a day-scoped title search used
//! for dedup, and event creation with popup reminders.

pub mod client;
pub mod error;
pub mod ical;
pub mod memory;

pub use client::CaldavClient;
pub use error::{CalendarError, Result};
pub use memory::MemoryCalendar;
