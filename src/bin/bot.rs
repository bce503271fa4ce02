use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hourglass::command_handler::CommandHandler;
use hourglass::core::Config;
use hourglass::features::keepalive;
use hourglass::features::reset::DailyResetNotifier;
use hourglass::features::timers::{DiscordNotifier, Notify, TimerService, TimerStore};

struct Handler {
    command_handler: CommandHandler,
    timer_service: TimerService,
    daily_reset: Option<Arc<DailyResetNotifier>>,
    started: AtomicBool,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e:#}");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        // Gateway reconnects replay Ready; resume persisted timers and start
        // the background tasks only on the first one.
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        self.timer_service
            .resume_all(chrono::Local::now().naive_local())
            .await;

        if let Some(daily_reset) = &self.daily_reset {
            tokio::spawn(Arc::clone(daily_reset).run());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting hourglass timer bot...");

    // Keep-alive stub for uptime monitors
    let keep_alive_port = config.keep_alive_port;
    tokio::spawn(async move {
        if let Err(e) = keepalive::keep_alive(keep_alive_port).await {
            error!("Keep-alive server failed: {e:#}");
        }
    });

    // Reminders go out over a plain HTTP client; the gateway connection is
    // only needed for inbound events.
    let http = Arc::new(Http::new(&config.discord_token));
    let notifier: Arc<dyn Notify> = Arc::new(DiscordNotifier::new(http));

    let store = TimerStore::new(&config.store_path);
    info!("💾 Timer store at {}", store.path().display());
    let timer_service = TimerService::new(store, Arc::clone(&notifier));
    let command_handler = CommandHandler::new(timer_service.clone());

    let daily_reset = match config.reset_channel_id {
        Some(channel_id) => Some(Arc::new(DailyResetNotifier::new(
            channel_id,
            Arc::clone(&notifier),
        ))),
        None => {
            info!("RESET_CHANNEL_ID not set - daily reset broadcast disabled");
            None
        }
    };

    let handler = Handler {
        command_handler,
        timer_service,
        daily_reset,
        started: AtomicBool::new(false),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
