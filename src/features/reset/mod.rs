//! # Daily Reset Broadcast
//!
//! Posts an `@here` notice to a configured channel when the game's offline
//! mode resets at 04:00 UTC+8. The clock is polled once a minute and the
//! notice goes out at most once per day.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::features::timers::Notify;

/// Offset of the reset wall clock from UTC, in hours. Fixed offset, no DST;
/// the deployment targets a single region.
const RESET_UTC_OFFSET_HOURS: i64 = 8;

/// Hour of day (UTC+8) at which offline mode resets.
const RESET_HOUR: u32 = 4;

const RESET_MESSAGE: &str = "@here offline mode has been reset. (04:00 UTC+8)";

pub struct DailyResetNotifier {
    channel_id: u64,
    notifier: Arc<dyn Notify>,
    last_notified: Mutex<Option<NaiveDate>>,
}

impl DailyResetNotifier {
    pub fn new(channel_id: u64, notifier: Arc<dyn Notify>) -> Self {
        DailyResetNotifier {
            channel_id,
            notifier,
            last_notified: Mutex::new(None),
        }
    }

    /// Minute-interval polling loop. Never returns.
    pub async fn run(self: Arc<Self>) {
        info!(
            "📣 Daily reset notifier watching channel {} for the {RESET_HOUR:02}:00 UTC+{RESET_UTC_OFFSET_HOURS} reset",
            self.channel_id
        );
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            self.tick(Utc::now().naive_utc()).await;
        }
    }

    /// One poll at `now_utc`; sends the notice when due. The sent-today
    /// marker is only set after a successful send, so a failed post retries
    /// on the next poll within the reset minute.
    async fn tick(&self, now_utc: NaiveDateTime) {
        let mut last = self.last_notified.lock().await;
        let local = now_utc + Duration::hours(RESET_UTC_OFFSET_HOURS);

        if !should_notify(local, *last) {
            return;
        }

        if let Err(e) = self.notifier.send(self.channel_id, RESET_MESSAGE).await {
            warn!("Failed to post daily reset notice: {e:#}");
            return;
        }

        info!("📣 Posted daily reset notice for {}", local.date());
        *last = Some(local.date());
    }
}

/// True when the UTC+8 clock reads 04:00 exactly and no notice has gone out
/// for that date yet.
fn should_notify(local: NaiveDateTime, last_notified: Option<NaiveDate>) -> bool {
    local.hour() == RESET_HOUR && local.minute() == 0 && last_notified != Some(local.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex as StdMutex;

    fn utc8(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_notifies_at_reset_minute() {
        assert!(should_notify(utc8(1, 4, 0), None));
    }

    #[test]
    fn test_quiet_outside_reset_minute() {
        assert!(!should_notify(utc8(1, 3, 59), None));
        assert!(!should_notify(utc8(1, 4, 1), None));
        assert!(!should_notify(utc8(1, 16, 0), None));
    }

    #[test]
    fn test_once_per_day() {
        let today = utc8(1, 4, 0);
        assert!(!should_notify(today, Some(today.date())));
        // The next day is due again.
        assert!(should_notify(utc8(2, 4, 0), Some(today.date())));
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: StdMutex<Vec<u64>>,
    }

    #[async_trait]
    impl Notify for CountingNotifier {
        async fn send(&self, channel_id: u64, _content: &str) -> Result<()> {
            self.sent.lock().unwrap().push(channel_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_tick_sends_once_within_reset_minute() {
        let notifier = Arc::new(CountingNotifier::default());
        let reset = Arc::new(DailyResetNotifier::new(123, notifier.clone()));

        // Two polls land in the same reset minute (UTC 20:00 == 04:00 UTC+8).
        let poll = NaiveDate::from_ymd_opt(2024, 4, 30)
            .unwrap()
            .and_hms_opt(20, 0, 10)
            .unwrap();
        reset.tick(poll).await;
        reset.tick(poll + Duration::seconds(20)).await;

        assert_eq!(notifier.sent.lock().unwrap().as_slice(), &[123]);
    }
}
