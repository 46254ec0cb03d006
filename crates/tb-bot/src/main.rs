//! taskbell: deadline reminder bot
//!
//! Reads task rows from a spreadsheet, emails assignees when a deadline is
//! 7/3/1 days away, and keeps a calendar event per open task.
//!
//! Usage:
//!   taskbell            - Start daemon mode (daily scheduled scan)
//!   taskbell --once     - Run a single scan and exit
//!   taskbell --help     - Show help

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tb_calendar::CaldavClient;
use tb_core::Config;
use tb_mail::EmailSender;
use tb_schedule::{ReminderScan, Scheduler};
use tb_sheets::SheetClient;

/// Run mode
enum RunMode {
    /// Daemon mode (daily scheduled scan)
    Daemon,
    /// Single scan, then exit
    Once,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("taskbell {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting taskbell...");
    tracing::info!(
        "Sheet: {} range {}",
        config.sheet.spreadsheet_id,
        config.sheet.range
    );

    let scan = Arc::new(build_scan(&config)?);

    match mode {
        RunMode::Once => run_once(scan).await,
        RunMode::Daemon => run_daemon(config, scan).await,
        _ => Ok(()),
    }
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--once" | "-1" => return RunMode::Once,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Daemon
}

/// Print help message
fn print_help() {
    println!("taskbell - deadline reminder bot");
    println!();
    println!("Usage:");
    println!("  taskbell            Start daemon mode (daily scheduled scan)");
    println!("  taskbell --once     Run a single scan and exit");
    println!("  taskbell --help     Show this help message");
    println!("  taskbell --version  Show version");
    println!();
    println!("Environment Variables:");
    println!("  SHEET_ID            Spreadsheet identifier (required)");
    println!("  SHEET_RANGE         Task table range (default: Tasks!A:E)");
    println!("  SHEET_TOKEN         Bearer token for the sheet values API");
    println!("  SMTP_HOST           SMTP relay host");
    println!("  SMTP_USER           SMTP username");
    println!("  SMTP_PASS           SMTP password");
    println!("  MAIL_FROM           From address on reminders");
    println!("  CALDAV_URL          CalDAV server URL");
    println!("  CALDAV_USER         CalDAV username");
    println!("  CALDAV_PASS         CalDAV password");
    println!("  REMINDER_OFFSETS    Days-before offsets (default: 7,3,1)");
    println!("  COMPLETED_MARKER    Done status text (default: completed)");
    println!("  SCHEDULE_HOUR       Daily scan hour (default: 8)");
    println!();
    println!("Settings can also be provided in taskbell.toml.");
}

/// Wire the production adapters into a scan.
fn build_scan(config: &Config) -> anyhow::Result<ReminderScan> {
    let sheet = SheetClient::new(config.sheet.clone())?;
    let mailer = EmailSender::new(config.mail.clone())?;
    let calendar = CaldavClient::new(config.calendar.clone())?;

    Ok(ReminderScan::new(
        config.scan.clone(),
        Arc::new(sheet),
        Arc::new(mailer),
        Arc::new(calendar),
    ))
}

/// Run a single scan and exit.
async fn run_once(scan: Arc<ReminderScan>) -> anyhow::Result<()> {
    let report = scan.run().await?;
    tracing::info!(
        "Scan complete: {} emails sent, {} events created, {} rows skipped",
        report.emails_sent,
        report.events_created,
        report.rows_skipped
    );
    if report.mail_failures > 0 || report.calendar_failures > 0 {
        tracing::warn!(
            "{} mail failures, {} calendar failures",
            report.mail_failures,
            report.calendar_failures
        );
    }
    Ok(())
}

/// Run daemon mode: daily scheduled scan until Ctrl+C.
async fn run_daemon(config: Config, scan: Arc<ReminderScan>) -> anyhow::Result<()> {
    if !config.scheduler.enabled {
        anyhow::bail!("scheduler is disabled; use --once for a single scan");
    }

    let scheduler = Scheduler::new(config.scheduler.clone(), scan);
    let handle = scheduler
        .start()
        .map_err(|e| anyhow::anyhow!("Scheduler error: {}", e))?;

    tracing::info!("taskbell initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    handle.stop().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
