//! # Timers Feature
//!
//! Fixed-duration (8-hour) activity timers triggered by plain chat messages.
//! A message shaped like `<nickname> HH:MM` starts a timer; the bot replies
//! with the estimated finish time and posts a reminder in the same channel
//! once the full duration has elapsed. Pending timers are persisted to a flat
//! file and resumed across restarts.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod notify;
pub mod parser;
pub mod record;
pub mod scheduler;
pub mod service;
pub mod store;

pub use notify::{DiscordNotifier, Notify};
pub use parser::{compute_times, parse_request, ParseOutcome, ParsedRequest, TimerTimes};
pub use record::{Registry, TimerKey, TimerRecord, TIMER_DURATION_HOURS};
pub use scheduler::TimerScheduler;
pub use service::{SubmitOutcome, TimerService};
pub use store::TimerStore;
