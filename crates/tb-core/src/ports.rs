//! Service port traits
//!
//! The three host services the scan talks to, each behind a small trait
//! with one production adapter and one in-memory fake in its adapter crate.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::Result;

/// A reminder email ready to hand to the mail service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// A calendar event returned by a day-scoped title search.
#[derive(Debug, Clone)]
pub struct EventSummary {
    /// Event title
    pub title: String,
    /// Event start
    pub start: NaiveDateTime,
}

/// A calendar event to be created for an open task.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Event title (the task name)
    pub title: String,
    /// Event description
    pub description: String,
    /// Event start
    pub start: NaiveDateTime,
    /// Event end
    pub end: NaiveDateTime,
    /// Optional guest to invite (the assignee's email)
    pub guest: Option<String>,
    /// Popup reminder offsets, minutes before start
    pub reminder_minutes: Vec<u32>,
}

/// Read access to the task spreadsheet.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read the full tabular range, header row included.
    ///
    /// Column order: task, status, owner, deadline, email.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>>;
}

/// Outbound mail service.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email. Failures are reported, never retried here.
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

/// Calendar read/write access.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Find events on the given calendar day whose title contains
    /// `title_query` (substring match, the dedup key).
    async fn find_events(&self, day: NaiveDate, title_query: &str) -> Result<Vec<EventSummary>>;

    /// Create a new event.
    async fn create_event(&self, draft: &EventDraft) -> Result<()>;
}
