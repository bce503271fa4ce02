//! Delayed delivery of timer completions.
//!
//! One suspended tokio task per pending timer, keyed by timer identity. Each
//! task sleeps until its deadline, runs the delivery future it was given and
//! then forgets itself. Keys hold the task's join handle, so pending delivery
//! can actually be aborted on reset instead of firing into a void.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::Local;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::features::timers::record::TimerKey;

#[derive(Clone, Default)]
pub struct TimerScheduler {
    tasks: Arc<DashMap<TimerKey, JoinHandle<()>>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks currently waiting to fire.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn the delivery task for `key`, sleeping until `key.finish`. A
    /// deadline that has already passed fires immediately. A key that is
    /// already scheduled is left untouched, which makes restart resumption
    /// safe to run twice.
    pub fn schedule<F, Fut>(&self, key: TimerKey, fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let slot = match self.tasks.entry(key.clone()) {
            Entry::Occupied(_) => {
                debug!(
                    "Timer '{}' for owner {} already scheduled, skipping",
                    key.label, key.owner_id
                );
                return;
            }
            Entry::Vacant(slot) => slot,
        };

        let tasks = Arc::clone(&self.tasks);
        let handle = tokio::spawn(async move {
            let delay = (key.finish - Local::now().naive_local())
                .to_std()
                .unwrap_or_default();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fire().await;
            tasks.remove(&key);
        });
        slot.insert(handle);
    }

    /// Abort the pending task for `key`, if any.
    pub fn cancel(&self, key: &TimerKey) {
        if let Some((_, handle)) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    /// Abort every pending task belonging to `owner_id`.
    pub fn cancel_owner(&self, owner_id: u64) {
        self.tasks.retain(|key, handle| {
            if key.owner_id == owner_id {
                handle.abort();
                false
            } else {
                true
            }
        });
    }
}
