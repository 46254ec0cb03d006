//! In-memory calendar fake for tests

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use tb_core::{CalendarStore, Error, EventDraft, EventSummary};

/// In-memory `CalendarStore` backed by a vector of created drafts.
#[derive(Debug, Default)]
pub struct MemoryCalendar {
    events: Mutex<Vec<EventDraft>>,
    fail_creates: Mutex<bool>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an existing event.
    pub fn seed(&self, draft: EventDraft) {
        self.events.lock().unwrap().push(draft);
    }

    /// Make subsequent creates fail.
    pub fn fail_creates(&self) {
        *self.fail_creates.lock().unwrap() = true;
    }

    /// Every event created (or seeded) so far.
    pub fn events(&self) -> Vec<EventDraft> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarStore for MemoryCalendar {
    async fn find_events(
        &self,
        day: NaiveDate,
        title_query: &str,
    ) -> tb_core::Result<Vec<EventSummary>> {
        let query = title_query.to_lowercase();
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.start.date() == day && e.title.to_lowercase().contains(&query))
            .map(|e| EventSummary {
                title: e.title.clone(),
                start: e.start,
            })
            .collect())
    }

    async fn create_event(&self, draft: &EventDraft) -> tb_core::Result<()> {
        if *self.fail_creates.lock().unwrap() {
            return Err(Error::Calendar("injected create failure".to_string()));
        }
        self.events.lock().unwrap().push(draft.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, day: NaiveDate) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: String::new(),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            end: day.and_hms_opt(10, 0, 0).unwrap(),
            guest: None,
            reminder_minutes: vec![60, 1440],
        }
    }

    #[tokio::test]
    async fn test_find_matches_day_and_substring() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let calendar = MemoryCalendar::new();
        calendar.seed(draft("Deadline: Ship report", day));
        calendar.seed(draft("Ship report", other_day));

        let found = calendar.find_events(day, "Ship report").await.unwrap();
        assert_eq!(found.len(), 1);

        let found = calendar.find_events(day, "ship REPORT").await.unwrap();
        assert_eq!(found.len(), 1, "title match is case-insensitive");

        let found = calendar.find_events(day, "Other task").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_create_records_event() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let calendar = MemoryCalendar::new();
        calendar.create_event(&draft("T", day)).await.unwrap();
        assert_eq!(calendar.events().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let calendar = MemoryCalendar::new();
        calendar.fail_creates();
        assert!(calendar.create_event(&draft("T", day)).await.is_err());
    }
}
