//! # Bot Configuration
//!
//! Environment-driven configuration, loaded once at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{Context, Result};

/// Default path of the timer store file.
pub const DEFAULT_STORE_PATH: &str = "timers.json";

/// Default port for the keep-alive HTTP stub.
pub const DEFAULT_KEEP_ALIVE_PORT: u16 = 8080;

/// Runtime configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (`DISCORD_TOKEN`, required)
    pub discord_token: String,
    /// Channel for the daily offline-mode reset broadcast (`RESET_CHANNEL_ID`,
    /// optional - the broadcast is disabled when unset)
    pub reset_channel_id: Option<u64>,
    /// Path of the timer store file (`TIMER_STORE_PATH`)
    pub store_path: String,
    /// Port the keep-alive HTTP stub listens on (`KEEP_ALIVE_PORT`)
    pub keep_alive_port: u16,
    /// Default log filter (`LOG_LEVEL`)
    pub log_level: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN environment variable is required")?;

        let reset_channel_id = match std::env::var("RESET_CHANNEL_ID") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .context("RESET_CHANNEL_ID must be a numeric channel ID")?,
            ),
            Err(_) => None,
        };

        let store_path = std::env::var("TIMER_STORE_PATH")
            .unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());

        let keep_alive_port = match std::env::var("KEEP_ALIVE_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("KEEP_ALIVE_PORT must be a port number")?,
            Err(_) => DEFAULT_KEEP_ALIVE_PORT,
        };

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            discord_token,
            reset_channel_id,
            store_path,
            keep_alive_port,
            log_level,
        })
    }
}
