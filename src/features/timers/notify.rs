//! Outbound delivery capability.
//!
//! The timer engine never talks to Discord directly; finished timers are
//! handed to a [`Notify`] implementation. The binary wires this to the
//! Discord HTTP API, tests substitute recording doubles.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

/// Posts an unsolicited message to a channel.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, channel_id: u64, content: &str) -> Result<()>;
}

/// [`Notify`] implementation backed by the Discord HTTP API.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordNotifier { http }
    }
}

#[async_trait]
impl Notify for DiscordNotifier {
    async fn send(&self, channel_id: u64, content: &str) -> Result<()> {
        ChannelId(channel_id).say(&self.http, content).await?;
        Ok(())
    }
}
