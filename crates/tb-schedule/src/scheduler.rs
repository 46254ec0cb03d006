//! Daily scan scheduler
//!
//! Fires the reminder scan once a day at the configured local time,
//! driven by a cron schedule.

use chrono::Local;
use cron::Schedule as CronSchedule;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use tb_core::SchedulerConfig;

use crate::error::Result;
use crate::scan::ReminderScan;

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Daily trigger for the reminder scan.
pub struct Scheduler {
    config: SchedulerConfig,
    scan: Arc<ReminderScan>,
}

impl Scheduler {
    /// Create a new scheduler.
    pub fn new(config: SchedulerConfig, scan: Arc<ReminderScan>) -> Self {
        Self { config, scan }
    }

    /// Start the scheduler task.
    ///
    /// Fails immediately when the configured time does not form a valid
    /// cron schedule; later scan failures are logged, not fatal.
    pub fn start(self) -> Result<SchedulerHandle> {
        let schedule = daily_schedule(self.config.hour, self.config.minute)?;
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        let shutdown_tx_clone = shutdown_tx.clone();

        let handle = tokio::spawn(async move {
            info!(
                "Scheduler started, daily scan at {:02}:{:02}",
                self.config.hour, self.config.minute
            );

            loop {
                let now = Local::now();
                let next = match schedule.upcoming(Local).next() {
                    Some(t) => t,
                    None => {
                        warn!("No upcoming fire time, stopping scheduler");
                        break;
                    }
                };

                let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
                info!(next = %next.format("%Y-%m-%d %H:%M:%S"), "waiting for next scan");

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        info!("Running scheduled scan");
                        match self.scan.run().await {
                            Ok(report) => {
                                info!(
                                    emails = report.emails_sent,
                                    events = report.events_created,
                                    "scheduled scan finished"
                                );
                            }
                            Err(e) => {
                                error!("Scheduled scan failed: {}", e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Shutdown requested");
                        break;
                    }
                }
            }

            info!("Scheduler stopped");
        });

        Ok(SchedulerHandle {
            shutdown_tx: shutdown_tx_clone,
            handle,
        })
    }
}

/// Build the daily cron schedule (the cron crate wants a seconds field).
fn daily_schedule(hour: u32, minute: u32) -> Result<CronSchedule> {
    let expr = format!("0 {} {} * * *", minute, hour);
    Ok(expr.parse::<CronSchedule>()?)
}
