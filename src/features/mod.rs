//! # Features Layer
//!
//! Every user-facing capability of the bot lives here as a feature module.

pub mod keepalive;
pub mod reset;
pub mod timers;

// Re-export feature items for convenience
pub use keepalive::keep_alive;
pub use reset::DailyResetNotifier;
pub use timers::{
    DiscordNotifier, Notify, SubmitOutcome, TimerRecord, TimerScheduler, TimerService, TimerStore,
};
