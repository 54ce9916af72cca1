//! # Taskhub Reminder Worker
//!
//! Sends a daily reminder email for every task that is due today and not
//! yet done. The recipient is the task's assignee, or the project owner
//! when the task is unassigned.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-reminder
//! ```

use taskhub_reminder::scheduler::{ReminderScheduler, SchedulerConfig};
use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
use taskhub_shared::email::Mailer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_reminder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhub Reminder Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
    let email_from = std::env::var("EMAIL_FROM")
        .map_err(|_| anyhow::anyhow!("EMAIL_FROM environment variable is required"))?;

    let pool = create_pool(DatabaseConfig {
        url: database_url,
        ..Default::default()
    })
    .await?;

    let mailer = Mailer::from_env(email_from).await;
    let scheduler = ReminderScheduler::new(pool, mailer, SchedulerConfig::from_env());

    scheduler.run().await;

    Ok(())
}
