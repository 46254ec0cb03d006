//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `taskbell.toml` configuration file
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the configuration file expands to the value of the
//! environment variable, or to the empty string when unset.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Error;

/// Spreadsheet read configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Base URL of the sheet values API
    #[serde(default = "default_sheet_base_url")]
    pub base_url: String,

    /// Spreadsheet identifier
    #[serde(default)]
    pub spreadsheet_id: String,

    /// A1-style range covering the task table, header row included
    #[serde(default = "default_sheet_range")]
    pub range: String,

    /// Bearer token for the values API
    #[serde(default)]
    pub token: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            base_url: default_sheet_base_url(),
            spreadsheet_id: String::new(),
            range: default_sheet_range(),
            token: String::new(),
        }
    }
}

fn default_sheet_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_sheet_range() -> String {
    "Tasks!A:E".to_string()
}

/// Mail sender configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username
    #[serde(default)]
    pub smtp_user: String,

    /// SMTP password
    #[serde(default, skip_serializing)]
    pub smtp_pass: String,

    /// From address on outgoing reminders
    #[serde(default)]
    pub from_address: String,

    /// Sender display name
    #[serde(default)]
    pub from_name: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_pass: String::new(),
            from_address: String::new(),
            from_name: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

/// Calendar (CalDAV) configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarConfig {
    /// CalDAV server URL
    #[serde(default)]
    pub server_url: String,

    /// Username for basic auth
    #[serde(default)]
    pub username: String,

    /// Password for basic auth
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Calendar collection id (defaults to the server's primary collection)
    #[serde(default)]
    pub calendar_id: Option<String>,
}

/// Reminder scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Days-before-deadline offsets at which a reminder email fires
    #[serde(default = "default_reminder_offsets")]
    pub reminder_offsets: Vec<i64>,

    /// Status text marking a task as done
    #[serde(default = "default_completed_marker")]
    pub completed_marker: String,

    /// Hour of day for created calendar events
    #[serde(default = "default_event_hour")]
    pub event_hour: u32,

    /// Minute of hour for created calendar events
    #[serde(default)]
    pub event_minute: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            reminder_offsets: default_reminder_offsets(),
            completed_marker: default_completed_marker(),
            event_hour: default_event_hour(),
            event_minute: 0,
        }
    }
}

fn default_reminder_offsets() -> Vec<i64> {
    vec![7, 3, 1]
}

fn default_completed_marker() -> String {
    "completed".to_string()
}

fn default_event_hour() -> u32 {
    9
}

/// Daily trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the daemon scheduler is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Hour of day for the daily scan
    #[serde(default = "default_schedule_hour")]
    pub hour: u32,

    /// Minute of hour for the daily scan
    #[serde(default)]
    pub minute: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: default_schedule_hour(),
            minute: 0,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_schedule_hour() -> u32 {
    8
}

/// Main configuration for taskbell
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Spreadsheet configuration
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Calendar configuration
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Scan configuration
    #[serde(default)]
    pub scan: ScanConfig,

    /// Scheduler configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` references against the environment.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file.
    ///
    /// `${VAR_NAME}` in the file expands to the environment variable's
    /// value; explicit environment variables still override afterwards.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        debug!("Loading configuration from: {}", path.as_ref().display());

        let toml_content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let mut config: Config = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the default path.
    ///
    /// Tries `./taskbell.toml`, falling back to environment variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new("taskbell.toml").exists() {
            return Self::from_toml_file("taskbell.toml");
        }

        debug!("No taskbell.toml found, using environment variables only");
        Self::from_env()
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Check the settings a scan cannot run without.
    ///
    /// Mail and calendar credentials are deliberately not required here:
    /// their failures surface per row during the scan.
    pub fn validate(&self) -> crate::Result<()> {
        if self.sheet.spreadsheet_id.is_empty() {
            return Err(Error::Config(
                "sheet.spreadsheet_id (or SHEET_ID) not set".to_string(),
            ));
        }
        if self.scan.event_hour > 23 || self.scan.event_minute > 59 {
            return Err(Error::Config(format!(
                "invalid event time {:02}:{:02}",
                self.scan.event_hour, self.scan.event_minute
            )));
        }
        if self.scheduler.hour > 23 || self.scheduler.minute > 59 {
            return Err(Error::Config(format!(
                "invalid schedule time {:02}:{:02}",
                self.scheduler.hour, self.scheduler.minute
            )));
        }
        Ok(())
    }

    /// Overlay environment variables onto the current values.
    fn apply_env_overrides(&mut self) {
        // Sheet
        if let Ok(v) = std::env::var("SHEET_BASE_URL") {
            self.sheet.base_url = v;
        }
        if let Ok(v) = std::env::var("SHEET_ID") {
            self.sheet.spreadsheet_id = v;
        }
        if let Ok(v) = std::env::var("SHEET_RANGE") {
            self.sheet.range = v;
        }
        if let Ok(v) = std::env::var("SHEET_TOKEN") {
            self.sheet.token = v;
        }

        // Mail
        if let Ok(v) = std::env::var("SMTP_HOST") {
            self.mail.smtp_host = v;
        }
        if let Ok(v) = std::env::var("SMTP_PORT") {
            if let Ok(port) = v.parse() {
                self.mail.smtp_port = port;
            }
        }
        if let Ok(v) = std::env::var("SMTP_USER") {
            self.mail.smtp_user = v;
        }
        if let Ok(v) = std::env::var("SMTP_PASS") {
            self.mail.smtp_pass = v;
        }
        if let Ok(v) = std::env::var("MAIL_FROM") {
            self.mail.from_address = v;
        }
        if let Ok(v) = std::env::var("MAIL_FROM_NAME") {
            self.mail.from_name = Some(v);
        }

        // Calendar
        if let Ok(v) = std::env::var("CALDAV_URL") {
            self.calendar.server_url = v;
        }
        if let Ok(v) = std::env::var("CALDAV_USER") {
            self.calendar.username = v;
        }
        if let Ok(v) = std::env::var("CALDAV_PASS") {
            self.calendar.password = v;
        }
        if let Ok(v) = std::env::var("CALDAV_CALENDAR_ID") {
            self.calendar.calendar_id = Some(v);
        }

        // Scan
        if let Ok(v) = std::env::var("REMINDER_OFFSETS") {
            let offsets: Vec<i64> = v
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if !offsets.is_empty() {
                self.scan.reminder_offsets = offsets;
            }
        }
        if let Ok(v) = std::env::var("COMPLETED_MARKER") {
            self.scan.completed_marker = v;
        }
        if let Ok(v) = std::env::var("EVENT_HOUR") {
            if let Ok(hour) = v.parse() {
                self.scan.event_hour = hour;
            }
        }
        if let Ok(v) = std::env::var("EVENT_MINUTE") {
            if let Ok(minute) = v.parse() {
                self.scan.event_minute = minute;
            }
        }

        // Scheduler
        if let Ok(v) = std::env::var("SCHEDULE_ENABLED") {
            self.scheduler.enabled = parse_flag(&v);
        }
        if let Ok(v) = std::env::var("SCHEDULE_HOUR") {
            if let Ok(hour) = v.parse() {
                self.scheduler.hour = hour;
            }
        }
        if let Ok(v) = std::env::var("SCHEDULE_MINUTE") {
            if let Ok(minute) = v.parse() {
                self.scheduler.minute = minute;
            }
        }
    }
}

/// Interpret an on/off environment value.
///
/// Unrecognized spellings count as enabled, with a logged warning.
fn parse_flag(value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "false" | "0" | "no" | "off" => false,
        "true" | "1" | "yes" | "on" => true,
        other => {
            warn!("Unrecognized boolean value '{}', treating as enabled", other);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scan.reminder_offsets, vec![7, 3, 1]);
        assert_eq!(config.scan.completed_marker, "completed");
        assert_eq!(config.scan.event_hour, 9);
        assert_eq!(config.scheduler.hour, 8);
        assert!(config.scheduler.enabled);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[sheet]
spreadsheet_id = "abc123"
range = "Tasks!A:E"

[scan]
reminder_offsets = [14, 7]
completed_marker = "done"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sheet.spreadsheet_id, "abc123");
        assert_eq!(config.scan.reminder_offsets, vec![14, 7]);
        assert_eq!(config.scan.completed_marker, "done");
        // Untouched sections keep their defaults
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.scan.event_hour, 9);
    }

    #[test]
    fn test_from_toml_file_expands_env_vars() {
        std::env::set_var("TASKBELL_TEST_SHEET_TOKEN", "tok-xyz");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[sheet]\nspreadsheet_id = \"abc\"\ntoken = \"${{TASKBELL_TEST_SHEET_TOKEN}}\""
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.sheet.token, "tok-xyz");

        std::env::remove_var("TASKBELL_TEST_SHEET_TOKEN");
    }

    #[test]
    fn test_env_overrides_file_value() {
        std::env::set_var("SHEET_ID", "env-id");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sheet]\nspreadsheet_id = \"file-id\"").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.sheet.spreadsheet_id, "env-id");

        std::env::remove_var("SHEET_ID");
    }

    #[test]
    fn test_parse_flag() {
        for v in ["false", "FALSE", "0", "no", "off", " Off "] {
            assert!(!parse_flag(v), "{:?} should disable", v);
        }
        for v in ["true", "1", "yes", "on"] {
            assert!(parse_flag(v), "{:?} should enable", v);
        }
        // Unrecognized spellings fall back to enabled
        assert!(parse_flag("maybe"));
    }

    #[test]
    fn test_validate_requires_spreadsheet_id() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sheet.spreadsheet_id = "abc".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_times() {
        let mut config = Config::default();
        config.sheet.spreadsheet_id = "abc".to_string();
        config.scan.event_hour = 24;
        assert!(config.validate().is_err());
    }
}
