//! iCalendar generation and minimal parsing
//!
//! Only the pieces CalDAV needs here: rendering a VEVENT with display
//! alarms for an event draft, and pulling SUMMARY/DTSTART back out of
//! calendar-data returned by a REPORT query.

use chrono::{NaiveDate, NaiveDateTime, Utc};

use tb_core::{EventDraft, EventSummary};

const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Escape a text value per RFC 5545 (backslash, semicolon, comma, newline).
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Render an event draft as a VCALENDAR body for a CalDAV PUT.
pub fn draft_to_ical(draft: &EventDraft, uid: &str) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//taskbell//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", Utc::now().format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART:{}", draft.start.format(DATETIME_FORMAT)),
        format!("DTEND:{}", draft.end.format(DATETIME_FORMAT)),
        format!("SUMMARY:{}", escape_text(&draft.title)),
        format!("DESCRIPTION:{}", escape_text(&draft.description)),
    ];

    if let Some(guest) = &draft.guest {
        lines.push(format!("ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:{}", guest));
    }

    for minutes in &draft.reminder_minutes {
        lines.push("BEGIN:VALARM".to_string());
        lines.push("ACTION:DISPLAY".to_string());
        lines.push(format!("DESCRIPTION:{}", escape_text(&draft.title)));
        lines.push(format!("TRIGGER:-PT{}M", minutes));
        lines.push("END:VALARM".to_string());
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

/// Parse one event out of a calendar-data blob.
///
/// Returns `None` when no SUMMARY/DTSTART pair is present (e.g. a VTODO
/// or an empty response element).
pub fn parse_ical_event(data: &str) -> Option<EventSummary> {
    let mut summary: Option<String> = None;
    let mut start: Option<NaiveDateTime> = None;

    for raw_line in data.lines() {
        let line = raw_line.trim_end_matches('\r');
        if let Some(value) = line.strip_prefix("SUMMARY:") {
            summary = Some(unescape_text(value));
        } else if line.starts_with("DTSTART") {
            // DTSTART may carry parameters: DTSTART;TZID=...:20240604T090000
            if let Some(value) = line.split(':').nth(1) {
                start = parse_ical_datetime(value);
            }
        }
    }

    Some(EventSummary {
        title: summary?,
        start: start?,
    })
}

fn unescape_text(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

fn parse_ical_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt);
    }
    // All-day events carry a bare date
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft() -> EventDraft {
        let day = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        EventDraft {
            title: "Ship report".to_string(),
            description: "Owner: Ana\nStatus: open".to_string(),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            end: day.and_hms_opt(10, 0, 0).unwrap(),
            guest: Some("ana@example.com".to_string()),
            reminder_minutes: vec![60, 1440],
        }
    }

    #[test]
    fn test_draft_to_ical_layout() {
        let ical = draft_to_ical(&draft(), "uid-1");
        assert!(ical.contains("SUMMARY:Ship report"));
        assert!(ical.contains("DTSTART:20240604T090000"));
        assert!(ical.contains("DTEND:20240604T100000"));
        assert!(ical.contains("ATTENDEE;PARTSTAT=NEEDS-ACTION:mailto:ana@example.com"));
        assert!(ical.contains("TRIGGER:-PT60M"));
        assert!(ical.contains("TRIGGER:-PT1440M"));
        assert_eq!(ical.matches("BEGIN:VALARM").count(), 2);
    }

    #[test]
    fn test_draft_to_ical_no_guest() {
        let mut d = draft();
        d.guest = None;
        let ical = draft_to_ical(&d, "uid-1");
        assert!(!ical.contains("ATTENDEE"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a,b;c\nd"), "a\\,b\\;c\\nd");
    }

    #[test]
    fn test_parse_ical_event() {
        let data = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:Ship report\r\nDTSTART:20240604T090000\r\nEND:VEVENT\r\nEND:VCALENDAR";
        let event = parse_ical_event(data).unwrap();
        assert_eq!(event.title, "Ship report");
        assert_eq!(
            event.start,
            NaiveDate::from_ymd_opt(2024, 6, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_ical_event_with_tzid_and_utc() {
        let data = "SUMMARY:X\nDTSTART;TZID=Europe/Paris:20240604T090000";
        assert!(parse_ical_event(data).is_some());

        let data = "SUMMARY:X\nDTSTART:20240604T090000Z";
        assert!(parse_ical_event(data).is_some());
    }

    #[test]
    fn test_parse_ical_event_all_day() {
        let data = "SUMMARY:X\nDTSTART;VALUE=DATE:20240604";
        let event = parse_ical_event(data).unwrap();
        assert_eq!(event.start.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn test_parse_ical_event_missing_summary() {
        assert!(parse_ical_event("DTSTART:20240604T090000").is_none());
    }
}
