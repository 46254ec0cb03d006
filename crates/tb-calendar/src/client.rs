//! CalDAV client implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, error, info};

use tb_core::{CalendarConfig, CalendarStore, EventDraft, EventSummary};

use crate::error::{CalendarError, Result};
use crate::ical;

/// CalDAV client for calendar operations
pub struct CaldavClient {
    client: Client,
    config: CalendarConfig,
    base_url: String,
}

impl CaldavClient {
    /// Create a new CalDAV client
    pub fn new(config: CalendarConfig) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| CalendarError::Configuration(e.to_string()))?;

        let base_url = config.server_url.trim_end_matches('/').to_string();

        info!("Calendar client initialized for: {}", base_url);

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Fetch events on one calendar day whose title contains `title_query`.
    pub async fn events_on_day(
        &self,
        day: NaiveDate,
        title_query: &str,
    ) -> Result<Vec<EventSummary>> {
        let url = format!("{}/{}", self.base_url, self.calendar_path());

        let start_str = format!("{}T000000Z", day.format("%Y%m%d"));
        let end_str = format!(
            "{}T000000Z",
            (day + chrono::Duration::days(1)).format("%Y%m%d")
        );

        let body = format!(
            r#"<?xml version="1.0" encoding="utf-8" ?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
    <D:prop>
        <D:getetag/>
        <C:calendar-data/>
    </D:prop>
    <C:filter>
        <C:comp-filter name="VCALENDAR">
            <C:comp-filter name="VEVENT">
                <C:time-range start="{}" end="{}"/>
            </C:comp-filter>
        </C:comp-filter>
    </C:filter>
</C:calendar-query>"#,
            start_str, end_str
        );

        debug!("Querying events on {} from: {}", day, url);

        let response = self
            .client
            .request(reqwest::Method::from_bytes(b"REPORT").unwrap(), &url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", "1")
            .body(body)
            .send()
            .await
            .map_err(|e| CalendarError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("CalDAV request failed: {} - {}", status, error_text);
            return Err(CalendarError::CaldavError(format!(
                "Request failed: {} - {}",
                status, error_text
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| CalendarError::HttpError(e.to_string()))?;

        let query = title_query.to_lowercase();
        let events: Vec<EventSummary> = parse_multistatus(&text)?
            .into_iter()
            .filter(|e| e.title.to_lowercase().contains(&query))
            .collect();

        debug!("Found {} matching events on {}", events.len(), day);
        Ok(events)
    }

    /// Create a new event from a draft.
    pub async fn put_event(&self, draft: &EventDraft) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.calendar_path());

        let uid = uuid::Uuid::new_v4().to_string();
        let ical = ical::draft_to_ical(draft, &uid);

        debug!("Creating event: {}", draft.title);

        let response = self
            .client
            .request(
                reqwest::Method::from_bytes(b"PUT").unwrap(),
                format!("{}/{}.ics", url, uid),
            )
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Content-Type", "text/calendar; charset=utf-8")
            .header("If-None-Match", "*")
            .body(ical)
            .send()
            .await
            .map_err(|e| CalendarError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Create event failed: {} - {}", status, error_text);
            return Err(CalendarError::CreateError(format!(
                "Failed to create event: {} - {}",
                status, error_text
            )));
        }

        info!("Created event: {} ({})", draft.title, uid);
        Ok(())
    }

    fn calendar_path(&self) -> String {
        self.config
            .calendar_id
            .clone()
            .unwrap_or_else(|| "calendars".to_string())
    }
}

/// Walk a multistatus response and collect every calendar-data event.
fn parse_multistatus(response: &str) -> Result<Vec<EventSummary>> {
    let mut events = Vec::new();
    let mut reader = Reader::from_str(response);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_calendar_data = false;
    let mut current_calendar_data = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"calendar-data" => {
                in_calendar_data = true;
                current_calendar_data.clear();
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"calendar-data" => {
                in_calendar_data = false;
                if let Some(event) = ical::parse_ical_event(&current_calendar_data) {
                    events.push(event);
                }
            }
            Ok(Event::Text(ref e)) if in_calendar_data => {
                current_calendar_data.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CalendarError::XmlParseError(e.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(events)
}

#[async_trait]
impl CalendarStore for CaldavClient {
    async fn find_events(
        &self,
        day: NaiveDate,
        title_query: &str,
    ) -> tb_core::Result<Vec<EventSummary>> {
        Ok(self.events_on_day(day, title_query).await?)
    }

    async fn create_event(&self, draft: &EventDraft) -> tb_core::Result<()> {
        Ok(self.put_event(draft).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = CalendarConfig {
            server_url: "https://caldav.example.com/".to_string(),
            username: "user".to_string(),
            password: "password".to_string(),
            calendar_id: Some("work".to_string()),
        };
        let client = CaldavClient::new(config).unwrap();
        assert_eq!(client.base_url, "https://caldav.example.com");
        assert_eq!(client.calendar_path(), "work");
    }

    #[test]
    fn test_parse_multistatus() {
        let xml = r#"<?xml version="1.0"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <D:propstat>
      <D:prop>
        <C:calendar-data>BEGIN:VCALENDAR
BEGIN:VEVENT
SUMMARY:Deadline: Ship report
DTSTART:20240604T090000
END:VEVENT
END:VCALENDAR</C:calendar-data>
      </D:prop>
    </D:propstat>
  </D:response>
</D:multistatus>"#;
        let events = parse_multistatus(xml).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Deadline: Ship report");
    }

    #[test]
    fn test_parse_multistatus_empty() {
        let xml =
            r#"<?xml version="1.0"?><D:multistatus xmlns:D="DAV:"></D:multistatus>"#;
        assert!(parse_multistatus(xml).unwrap().is_empty());
    }
}
