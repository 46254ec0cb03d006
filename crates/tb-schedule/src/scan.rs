//! The reminder scan
//!
//! One pass over the task sheet. Rows are independent: a mail or calendar
//! failure on one row is logged and the scan moves on.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use tb_core::task::day_phrase;
use tb_core::{
    CalendarStore, Error, EventDraft, Mailer, OutboundEmail, ScanConfig, SheetStore, TaskRow,
};

use crate::error::Result;

/// Popup reminder offsets on created events, minutes before start.
const EVENT_REMINDER_MINUTES: [u32; 2] = [60, 1440];

/// Counters from one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Data rows that parsed into a task
    pub rows_seen: usize,
    /// Rows skipped as malformed
    pub rows_skipped: usize,
    /// Reminder emails delivered
    pub emails_sent: usize,
    /// Reminder emails that failed to send
    pub mail_failures: usize,
    /// Calendar events created
    pub events_created: usize,
    /// Calendar lookups or creates that failed
    pub calendar_failures: usize,
}

/// The daily reminder scan over the task sheet.
pub struct ReminderScan {
    config: ScanConfig,
    sheet: Arc<dyn SheetStore>,
    mailer: Arc<dyn Mailer>,
    calendar: Arc<dyn CalendarStore>,
}

impl ReminderScan {
    /// Create a new scan over the given service ports.
    pub fn new(
        config: ScanConfig,
        sheet: Arc<dyn SheetStore>,
        mailer: Arc<dyn Mailer>,
        calendar: Arc<dyn CalendarStore>,
    ) -> Self {
        Self {
            config,
            sheet,
            mailer,
            calendar,
        }
    }

    /// Run one scan against today's date.
    pub async fn run(&self) -> Result<ScanReport> {
        self.run_for_date(Local::now().date_naive()).await
    }

    /// Run one scan treating `today` as the current date.
    ///
    /// The sheet is read fresh; a read failure aborts the whole scan since
    /// there is nothing to iterate.
    pub async fn run_for_date(&self, today: NaiveDate) -> Result<ScanReport> {
        let rows = self.sheet.read_rows().await?;
        let mut report = ScanReport::default();

        // First row is the header
        for (idx, cells) in rows.iter().enumerate().skip(1) {
            let row_number = idx + 1;

            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }

            let row = match TaskRow::from_cells(cells) {
                Ok(row) => row,
                Err(e) => {
                    warn!(row = row_number, "skipping malformed row: {}", e);
                    report.rows_skipped += 1;
                    continue;
                }
            };
            report.rows_seen += 1;

            if !row.is_open(&self.config.completed_marker) {
                debug!(task = %row.name, "completed, skipping");
                continue;
            }

            let days = row.days_until(today);
            if self.config.reminder_offsets.contains(&days) {
                if let Some(to) = row.email.clone() {
                    let email = reminder_email(&row, days, to);
                    match self.mailer.send(&email).await {
                        Ok(()) => {
                            info!(task = %row.name, days, to = %email.to, "reminder email sent");
                            report.emails_sent += 1;
                        }
                        Err(e) => {
                            error!(task = %row.name, "mail send failed: {}", e);
                            report.mail_failures += 1;
                        }
                    }
                } else {
                    debug!(task = %row.name, days, "no email address, skipping reminder");
                }
            }

            match self.sync_calendar(&row).await {
                Ok(true) => report.events_created += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(task = %row.name, "calendar sync failed: {}", e);
                    report.calendar_failures += 1;
                }
            }
        }

        info!(
            rows = report.rows_seen,
            skipped = report.rows_skipped,
            emails = report.emails_sent,
            mail_failures = report.mail_failures,
            events = report.events_created,
            calendar_failures = report.calendar_failures,
            "scan finished"
        );
        Ok(report)
    }

    /// Ensure a calendar event exists for an open task.
    ///
    /// Dedup is a title text search on the deadline day, not an id match:
    /// anything already titled with the task name counts as the event.
    async fn sync_calendar(&self, row: &TaskRow) -> tb_core::Result<bool> {
        let existing = self.calendar.find_events(row.deadline, &row.name).await?;
        if !existing.is_empty() {
            debug!(task = %row.name, "calendar event already present");
            return Ok(false);
        }

        let start = row
            .deadline
            .and_hms_opt(self.config.event_hour, self.config.event_minute, 0)
            .ok_or_else(|| {
                Error::Config(format!(
                    "invalid event time {:02}:{:02}",
                    self.config.event_hour, self.config.event_minute
                ))
            })?;

        let draft = EventDraft {
            title: format!("Deadline: {}", row.name),
            description: format!(
                "Task \"{}\" is due.\nOwner: {}\nStatus: {}",
                row.name, row.owner, row.status
            ),
            start,
            end: start + chrono::Duration::hours(1),
            guest: row.email.clone(),
            reminder_minutes: EVENT_REMINDER_MINUTES.to_vec(),
        };

        self.calendar.create_event(&draft).await?;
        info!(task = %row.name, day = %row.deadline, "calendar event created");
        Ok(true)
    }
}

/// Build the fixed-template reminder email for a task.
fn reminder_email(row: &TaskRow, days: i64, to: String) -> OutboundEmail {
    let due = if days == 1 {
        "due tomorrow".to_string()
    } else {
        format!("due in {}", day_phrase(days))
    };

    OutboundEmail {
        to,
        subject: format!("Reminder: \"{}\" is {}", row.name, due),
        body: format!(
            "Hi {},\n\n\
             This is a reminder that the task \"{}\" is {} (deadline: {}).\n\
             Current status: {}.\n\n\
             Please make sure it is on track.\n",
            row.owner,
            row.name,
            due,
            row.deadline.format("%Y-%m-%d"),
            row.status
        ),
    }
}
