//! Task row domain model
//!
//! A task row is one line of the tracking spreadsheet, column order:
//! task name, status, owner, deadline, email. Rows are read fresh on every
//! scan and never written back.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Accepted deadline cell formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One row of the task spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Task name
    pub name: String,
    /// Status text, compared against the configured completed marker
    pub status: String,
    /// Owner display name
    pub owner: String,
    /// Deadline date (time of day ignored)
    pub deadline: NaiveDate,
    /// Assignee email address, if the cell is non-empty
    pub email: Option<String>,
}

impl TaskRow {
    /// Parse a row from raw spreadsheet cells.
    ///
    /// The sheet API returns trailing empty cells inconsistently, so any
    /// column past the deadline may be absent entirely.
    pub fn from_cells(cells: &[String]) -> Result<Self> {
        let name = cells.first().map(|s| s.trim()).unwrap_or_default();
        if name.is_empty() {
            return Err(Error::RowParse("empty task name".to_string()));
        }

        let deadline_cell = cells
            .get(3)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::RowParse(format!("task '{}': missing deadline", name)))?;
        let deadline = parse_deadline(deadline_cell).ok_or_else(|| {
            Error::RowParse(format!("task '{}': unparseable deadline '{}'", name, deadline_cell))
        })?;

        let email = cells
            .get(4)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Ok(Self {
            name: name.to_string(),
            status: cells.get(1).map(|s| s.trim()).unwrap_or_default().to_string(),
            owner: cells.get(2).map(|s| s.trim()).unwrap_or_default().to_string(),
            deadline,
            email,
        })
    }

    /// Whether this task is still open (status does not match the marker).
    ///
    /// Sheet cells are hand-typed, so the comparison trims whitespace and
    /// ignores ASCII case.
    pub fn is_open(&self, completed_marker: &str) -> bool {
        !self
            .status
            .trim()
            .eq_ignore_ascii_case(completed_marker.trim())
    }

    /// Whole days from `today` until the deadline, date-only.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }
}

/// Parse a deadline cell, trying each accepted format.
pub fn parse_deadline(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
}

/// Human phrase for a reminder distance: "tomorrow" or "N days".
pub fn day_phrase(days: i64) -> String {
    if days == 1 {
        "tomorrow".to_string()
    } else {
        format!("{} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_cells_full_row() {
        let row = TaskRow::from_cells(&cells(&[
            "Ship report",
            "In progress",
            "Ana",
            "2024-06-04",
            "ana@example.com",
        ]))
        .unwrap();
        assert_eq!(row.name, "Ship report");
        assert_eq!(row.deadline, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        assert_eq!(row.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_from_cells_short_row_has_no_email() {
        let row =
            TaskRow::from_cells(&cells(&["Ship report", "open", "Ana", "2024-06-04"])).unwrap();
        assert_eq!(row.email, None);
    }

    #[test]
    fn test_from_cells_empty_email_cell() {
        let row =
            TaskRow::from_cells(&cells(&["Ship report", "open", "Ana", "2024-06-04", "  "]))
                .unwrap();
        assert_eq!(row.email, None);
    }

    #[test]
    fn test_from_cells_rejects_bad_deadline() {
        let err = TaskRow::from_cells(&cells(&["T", "open", "Ana", "next tuesday"])).unwrap_err();
        assert!(matches!(err, Error::RowParse(_)));
    }

    #[test]
    fn test_from_cells_rejects_empty_name() {
        let err = TaskRow::from_cells(&cells(&["", "open", "Ana", "2024-06-04"])).unwrap_err();
        assert!(matches!(err, Error::RowParse(_)));
    }

    #[test]
    fn test_parse_deadline_us_format() {
        assert_eq!(
            parse_deadline("6/4/2024"),
            NaiveDate::from_ymd_opt(2024, 6, 4)
        );
    }

    #[test]
    fn test_is_open_case_insensitive() {
        let row =
            TaskRow::from_cells(&cells(&["T", " Completed ", "Ana", "2024-06-04"])).unwrap();
        assert!(!row.is_open("completed"));
    }

    #[test]
    fn test_days_until() {
        let row = TaskRow::from_cells(&cells(&["T", "open", "Ana", "2024-06-04"])).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(row.days_until(today), 3);
    }

    #[test]
    fn test_days_until_past_deadline_is_negative() {
        let row = TaskRow::from_cells(&cells(&["T", "open", "Ana", "2024-06-04"])).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(row.days_until(today), -6);
    }

    #[test]
    fn test_day_phrase() {
        assert_eq!(day_phrase(1), "tomorrow");
        assert_eq!(day_phrase(3), "3 days");
        assert_eq!(day_phrase(7), "7 days");
    }
}
