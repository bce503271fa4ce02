//! Inbound message routing.
//!
//! Prefix commands (`!list`, `!reset`) are answered directly; every other
//! message is offered to the timer engine. Messages that are not timer
//! requests get no reply at all - most chatter is none of our business.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use uuid::Uuid;

use crate::features::timers::{SubmitOutcome, TimerService};

/// Prefix for the two query commands.
pub const COMMAND_PREFIX: char = '!';

#[derive(Clone)]
pub struct CommandHandler {
    timer_service: TimerService,
}

impl CommandHandler {
    pub fn new(timer_service: TimerService) -> Self {
        CommandHandler { timer_service }
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = msg.author.id.0;
        let channel_id = msg.channel_id.0;
        let text = msg.content.trim();

        debug!("[{request_id}] 📥 Message | user: {user_id} | channel: {channel_id}");

        if let Some(command) = text.strip_prefix(COMMAND_PREFIX) {
            return self
                .handle_command(ctx, msg, request_id, command.trim(), user_id)
                .await;
        }

        let outcome = self
            .timer_service
            .submit(user_id, channel_id, text, Local::now().naive_local())
            .await;

        match outcome {
            SubmitOutcome::NotATimer => {
                debug!("[{request_id}] Not a timer request, ignoring");
            }
            SubmitOutcome::AlreadyFinished {
                label,
                finish_display,
            } => {
                info!("[{request_id}] ⌛ Already finished | user: {user_id} | label: '{label}'");
                msg.reply(
                    &ctx.http,
                    format!(
                        "**Nickname :** {label}\n**Estimated Finish :** {finish_display} (already finished)"
                    ),
                )
                .await?;
            }
            SubmitOutcome::Created {
                label,
                start_display,
                finish_display,
            } => {
                info!("[{request_id}] ⏳ Timer accepted | user: {user_id} | label: '{label}'");
                msg.reply(
                    &ctx.http,
                    format!(
                        "**Nickname :** {label}\n**Starting Time :** {start_display}\n**Estimated Finish :** {finish_display}"
                    ),
                )
                .await?;
            }
        }

        Ok(())
    }

    async fn handle_command(
        &self,
        ctx: &Context,
        msg: &Message,
        request_id: Uuid,
        command: &str,
        user_id: u64,
    ) -> Result<()> {
        match command {
            "list" => {
                info!("[{request_id}] 📋 List requested | user: {user_id}");
                let timers = self.timer_service.list(user_id).await;
                msg.reply(&ctx.http, render_timer_list(&timers)).await?;
            }
            "reset" => {
                info!("[{request_id}] 🧹 Reset requested | user: {user_id}");
                let removed = self.timer_service.reset_all(user_id).await;
                let reply = if removed == 0 {
                    "You had no active timers.".to_string()
                } else {
                    format!("Cleared {removed} timer(s).")
                };
                msg.reply(&ctx.http, reply).await?;
            }
            other => {
                debug!("[{request_id}] Unknown command '{other}', ignoring");
            }
        }

        Ok(())
    }
}

/// Render the `!list` reply, soonest timer first.
fn render_timer_list(timers: &[(String, NaiveDateTime)]) -> String {
    if timers.is_empty() {
        return "📋 You have no active timers.".to_string();
    }

    let mut out = String::from("📋 **Your active timers:**\n");
    for (label, finish) in timers {
        out.push_str(&format!(
            "• **{label}**: finishes at {}\n",
            finish.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}
