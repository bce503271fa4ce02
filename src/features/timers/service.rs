//! Timer lifecycle orchestration.
//!
//! The service owns the in-memory registry and is the only writer of the
//! store file, keeping both in agreement: every mutation persists before
//! control returns. Parsing failures are outcomes rather than errors - most
//! messages are simply not timer requests.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0

use chrono::NaiveDateTime;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::features::timers::notify::Notify;
use crate::features::timers::parser::{self, ParseOutcome};
use crate::features::timers::record::{Registry, TimerKey, TimerRecord, FINISH_FORMAT};
use crate::features::timers::scheduler::TimerScheduler;
use crate::features::timers::store::TimerStore;

/// Format for the start/finish times quoted back to the user.
const TIME_DISPLAY_FORMAT: &str = "%H:%M";

/// User-visible result of submitting one message to the timer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not a timer request (no match, or an out-of-range time token). The
    /// message gets no reply.
    NotATimer,
    /// The displayed finish estimate already lies in the past; nothing was
    /// created or scheduled.
    AlreadyFinished {
        label: String,
        finish_display: String,
    },
    /// A timer was created, persisted and scheduled.
    Created {
        label: String,
        start_display: String,
        finish_display: String,
    },
}

/// Cheap to clone; clones share the registry, store and scheduled tasks.
#[derive(Clone)]
pub struct TimerService {
    store: Arc<TimerStore>,
    registry: Arc<RwLock<Registry>>,
    scheduler: TimerScheduler,
    notifier: Arc<dyn Notify>,
}

impl TimerService {
    /// Build the service and load whatever the store holds. Call
    /// [`resume_all`](Self::resume_all) afterwards to reschedule it.
    pub fn new(store: TimerStore, notifier: Arc<dyn Notify>) -> Self {
        let registry = store.load();
        TimerService {
            store: Arc::new(store),
            registry: Arc::new(RwLock::new(registry)),
            scheduler: TimerScheduler::new(),
            notifier,
        }
    }

    /// Submit one inbound message at reference instant `now`.
    pub async fn submit(
        &self,
        owner_id: u64,
        channel_id: u64,
        text: &str,
        now: NaiveDateTime,
    ) -> SubmitOutcome {
        let request = match parser::parse_request(text) {
            Ok(request) => request,
            Err(ParseOutcome::NoMatch) => return SubmitOutcome::NotATimer,
            Err(ParseOutcome::InvalidTime) => {
                debug!("Ignoring message with out-of-range time token");
                return SubmitOutcome::NotATimer;
            }
        };

        let times = parser::compute_times(request.start, now);

        // The typed time is pinned to today's date; when its 8-hour window
        // already closed there is nothing left to track.
        if times.finish_display <= now {
            return SubmitOutcome::AlreadyFinished {
                label: request.label,
                finish_display: times.finish_display.format(TIME_DISPLAY_FORMAT).to_string(),
            };
        }

        let record = TimerRecord {
            label: request.label,
            finish: times.finish_at,
            channel_id,
        };

        {
            let mut registry = self.registry.write().await;
            registry.entry(owner_id).or_default().push(record.clone());
            self.persist(&registry);
        }
        self.schedule_delivery(owner_id, &record);

        info!(
            "⏳ Timer created | owner: {owner_id} | label: '{}' | due: {}",
            record.label,
            record.finish.format(FINISH_FORMAT)
        );

        SubmitOutcome::Created {
            label: record.label,
            start_display: times.start_display.format(TIME_DISPLAY_FORMAT).to_string(),
            finish_display: times.finish_display.format(TIME_DISPLAY_FORMAT).to_string(),
        }
    }

    /// The owner's pending timers, soonest first. Sorting is a view concern;
    /// the registry itself keeps insertion order.
    pub async fn list(&self, owner_id: u64) -> Vec<(String, NaiveDateTime)> {
        let registry = self.registry.read().await;
        let mut timers: Vec<(String, NaiveDateTime)> = registry
            .get(&owner_id)
            .map(|records| {
                records
                    .iter()
                    .map(|record| (record.label.clone(), record.finish))
                    .collect()
            })
            .unwrap_or_default();
        timers.sort_by_key(|(_, finish)| *finish);
        timers
    }

    /// Drop every pending timer for `owner_id` and abort their scheduled
    /// deliveries. Returns how many records were removed.
    pub async fn reset_all(&self, owner_id: u64) -> usize {
        let removed = {
            let mut registry = self.registry.write().await;
            let removed = registry.remove(&owner_id).map(|r| r.len()).unwrap_or(0);
            if removed > 0 {
                self.persist(&registry);
            }
            removed
        };
        self.scheduler.cancel_owner(owner_id);

        info!("🧹 Reset {removed} timer(s) for owner {owner_id}");
        removed
    }

    /// Reconstruct scheduled deliveries after a restart. Records whose
    /// deadline is at or before `now` are dropped without a reminder - the
    /// owner missed them across the restart window. Safe to call twice with
    /// the same `now`.
    pub async fn resume_all(&self, now: NaiveDateTime) {
        let mut resumed = Vec::new();
        let mut expired = 0usize;

        {
            let mut registry = self.registry.write().await;
            for (&owner_id, records) in registry.iter_mut() {
                records.retain(|record| {
                    if record.finish <= now {
                        expired += 1;
                        false
                    } else {
                        resumed.push((owner_id, record.clone()));
                        true
                    }
                });
            }
            registry.retain(|_, records| !records.is_empty());
            if expired > 0 {
                self.persist(&registry);
            }
        }

        for (owner_id, record) in &resumed {
            self.schedule_delivery(*owner_id, record);
        }

        info!(
            "🔄 Resume complete | rescheduled: {} | dropped expired: {expired}",
            resumed.len()
        );
    }

    /// Number of deliveries currently scheduled. Exposed for observability.
    pub fn scheduled_count(&self) -> usize {
        self.scheduler.pending()
    }

    fn schedule_delivery(&self, owner_id: u64, record: &TimerRecord) {
        let key = record.key(owner_id);
        let service = self.clone();
        self.scheduler.schedule(key.clone(), move || async move {
            service.deliver(key).await;
        });
    }

    /// Runs at the deadline: send the reminder, then drop the record. A
    /// record that vanished in the meantime (reset raced the firing) skips
    /// the send; a failed send still drops the record - delivery is
    /// best-effort, at-most-once.
    async fn deliver(&self, key: TimerKey) {
        let channel_id = {
            let registry = self.registry.read().await;
            registry.get(&key.owner_id).and_then(|records| {
                records
                    .iter()
                    .find(|r| r.label == key.label && r.finish == key.finish)
                    .map(|r| r.channel_id)
            })
        };

        match channel_id {
            Some(channel_id) => {
                let content = format!("<@{}> reminder:\n{} is finished.", key.owner_id, key.label);
                if let Err(e) = self.notifier.send(channel_id, &content).await {
                    warn!(
                        "Failed to deliver reminder '{}' to channel {channel_id}: {e:#}",
                        key.label
                    );
                }
            }
            None => debug!(
                "Timer '{}' for owner {} fired but its record is gone",
                key.label, key.owner_id
            ),
        }

        self.remove(&key).await;
    }

    /// Remove the first record matching `key`. Removing an absent record is
    /// a no-op, not an error.
    async fn remove(&self, key: &TimerKey) {
        let mut registry = self.registry.write().await;
        let Some(records) = registry.get_mut(&key.owner_id) else {
            return;
        };
        let Some(pos) = records
            .iter()
            .position(|r| r.label == key.label && r.finish == key.finish)
        else {
            return;
        };

        records.remove(pos);
        if records.is_empty() {
            registry.remove(&key.owner_id);
        }
        self.persist(&registry);
    }

    /// Write-through to disk. Failures are logged and absorbed; persistence
    /// is best-effort and never surfaces to the user.
    fn persist(&self, registry: &Registry) {
        if let Err(e) = self.store.save(registry) {
            error!("Failed to persist timer store: {e:#}");
        }
    }
}
