// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Application layer
pub mod command_handler;

// Re-export core config for convenience
pub use self::core::Config;

// Re-export feature items for convenience
pub use features::{
    // Keep-alive
    keep_alive,
    // Daily reset broadcast
    DailyResetNotifier,
    // Timers
    DiscordNotifier, Notify, SubmitOutcome, TimerRecord, TimerScheduler, TimerService, TimerStore,
};
