//! Periodic payment reminders and contract expiry

use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crm_core::services::ReminderService;

pub async fn run_reminders(reminders: ReminderService, interval_seconds: u64) {
    let mut ticker = interval(Duration::from_secs(interval_seconds.max(60)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Reminder scheduler started (every {}s)", interval_seconds.max(60));

    loop {
        ticker.tick().await;
        let today = Utc::now().date_naive();
        match reminders.run(today).await {
            Ok(summary) => info!("Reminder run for {} finished: {:?}", today, summary),
            Err(e) => error!("Reminder run for {} failed: {}", today, e),
        }
    }
}
