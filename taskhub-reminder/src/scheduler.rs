/// Daily reminder scheduler
///
/// Implements the worker loop: sleep until the next firing time (a fixed
/// hour of the day, UTC), scan for tasks due within the current calendar
/// day that are not done, and send one reminder email per task. A failed
/// send is logged and the scan moves on; a failed scan is logged and the
/// loop waits for the next firing. There is no retry or dead-letter
/// handling, so delivery is at-least-once across restarts.
///
/// # Example
///
/// ```no_run
/// use taskhub_reminder::scheduler::{ReminderScheduler, SchedulerConfig};
/// use taskhub_shared::email::Mailer;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, mailer: Mailer) {
/// let scheduler = ReminderScheduler::new(pool, mailer, SchedulerConfig::default());
/// scheduler.run().await;
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use sqlx::PgPool;
use taskhub_shared::email::Mailer;
use taskhub_shared::models::task::Task;
use tracing::{error, info};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Hour of day (UTC, 0-23) at which the daily scan fires
    pub fire_hour_utc: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig { fire_hour_utc: 8 }
    }
}

impl SchedulerConfig {
    /// Loads the firing hour from `REMINDER_HOUR_UTC`, defaulting to 08:00
    pub fn from_env() -> Self {
        let fire_hour_utc = std::env::var("REMINDER_HOUR_UTC")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|h| *h < 24)
            .unwrap_or(8);

        SchedulerConfig { fire_hour_utc }
    }
}

/// Daily reminder scheduler
///
/// Owns the pool and mailer for the lifetime of the worker.
pub struct ReminderScheduler {
    pool: PgPool,
    mailer: Mailer,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    /// Creates a new scheduler
    pub fn new(pool: PgPool, mailer: Mailer, config: SchedulerConfig) -> Self {
        Self {
            pool,
            mailer,
            config,
        }
    }

    /// Runs the scheduler loop forever
    pub async fn run(&self) {
        info!(
            fire_hour_utc = self.config.fire_hour_utc,
            "Reminder scheduler started"
        );

        loop {
            let now = Utc::now();
            let next = next_firing(now, self.config.fire_hour_utc);
            let wait = (next - now)
                .to_std()
                .unwrap_or_else(|_| std::time::Duration::from_secs(0));

            info!(next_firing = %next, "Sleeping until next reminder scan");
            tokio::time::sleep(wait).await;

            if let Err(e) = self.scan_and_send().await {
                error!("Reminder scan failed: {}", e);
            }
        }
    }

    /// Scans for tasks due today and sends one reminder each
    ///
    /// Individual send failures are logged and do not stop the scan.
    ///
    /// # Errors
    ///
    /// Returns an error only if the due-task query itself fails.
    pub async fn scan_and_send(&self) -> Result<(), sqlx::Error> {
        let (day_start, day_end) = day_window(Utc::now());

        let due = Task::find_due_between(&self.pool, day_start, day_end).await?;
        info!(count = due.len(), "Found tasks due today");

        let mut sent = 0usize;
        for reminder in &due {
            match self.mailer.send_due_reminder(reminder).await {
                Ok(()) => {
                    sent += 1;
                    let (recipient, _) = reminder.recipient();
                    info!(task_id = %reminder.task_id, recipient, "Reminder sent");
                }
                Err(e) => {
                    error!(task_id = %reminder.task_id, "Failed to send reminder: {}", e);
                }
            }
        }

        info!(sent, total = due.len(), "Reminder scan complete");
        Ok(())
    }
}

/// Computes the next firing instant strictly after `now`
///
/// If today's firing hour has not passed yet, fires today; otherwise
/// tomorrow at the same hour.
pub fn next_firing(now: DateTime<Utc>, fire_hour_utc: u32) -> DateTime<Utc> {
    let today = now
        .date_naive()
        .and_hms_opt(fire_hour_utc, 0, 0)
        .and_then(|naive| Utc.from_local_datetime(&naive).single())
        .unwrap_or(now);

    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Bounds of the calendar day containing `now`: [midnight, next midnight)
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| Utc.from_local_datetime(&naive).single())
        .unwrap_or(now);

    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_next_firing_later_today() {
        let next = next_firing(at(6, 30), 8);
        assert_eq!(next, at(8, 0));
    }

    #[test]
    fn test_next_firing_rolls_to_tomorrow() {
        let next = next_firing(at(8, 0), 8);
        assert_eq!(next, at(8, 0) + Duration::days(1));

        let next = next_firing(at(23, 59), 8);
        assert_eq!(next, at(8, 0) + Duration::days(1));
    }

    #[test]
    fn test_day_window_covers_the_whole_day() {
        let (start, end) = day_window(at(13, 37));

        assert_eq!(start, at(0, 0));
        assert_eq!(end - start, Duration::days(1));
        assert_eq!(start.hour(), 0);
    }

    #[test]
    fn test_config_default_fires_at_eight() {
        assert_eq!(SchedulerConfig::default().fire_hour_utc, 8);
    }
}
