//! Discord bot core logic and event handling.

use log::{debug, error, info, warn};
use poise::{
    CreateReply, Framework, FrameworkError, FrameworkOptions, builtins,
    serenity_prelude::{ChannelId, ClientBuilder, Context, FullEvent, GatewayIntents},
};
use tokio_util::sync::CancellationToken;

use crate::broadcast::{PacedBroadcaster, broadcast_commands};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::health;
use crate::openrouter::OpenRouterClient;
use crate::triage::{KeywordTable, TriageContext, handle_message, triage_commands};

type EventResult = Result<()>;

/// Shared, read-only state handed to every command and event.
pub struct Data {
    triage: TriageContext,
    openrouter_client: OpenRouterClient,
    broadcaster: PacedBroadcaster,
    operator_channel: Option<ChannelId>,
    shutdown: CancellationToken,
}

impl Data {
    #[must_use]
    pub fn triage(&self) -> &TriageContext {
        &self.triage
    }

    #[must_use]
    pub fn openrouter_client(&self) -> &OpenRouterClient {
        &self.openrouter_client
    }

    #[must_use]
    pub fn broadcaster(&self) -> &PacedBroadcaster {
        &self.broadcaster
    }

    #[must_use]
    pub fn operator_channel(&self) -> Option<ChannelId> {
        self.operator_channel
    }

    /// Cancelled when the process shuts down.
    #[must_use]
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }
}

/// Run the Discord bot and the health endpoint until Ctrl-C.
///
/// # Errors
///
/// Returns an error if configuration is missing, the health port cannot be
/// bound, or the Discord client fails.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;
    let shutdown = CancellationToken::new();

    let health_listener = health::bind(config.health_port).await?;
    let health_task = tokio::spawn(health::serve(health_listener, shutdown.clone()));

    debug!("Initializing OpenRouter client");
    let openrouter_client = OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    );

    let data = Data {
        triage: TriageContext::new(
            KeywordTable::for_policy(config.trigger_policy),
            config.persona_prompt.clone(),
            config.delivery_mode,
        ),
        openrouter_client,
        broadcaster: PacedBroadcaster::new(config.broadcast_count, config.broadcast_interval),
        operator_channel: config.operator_channel,
        shutdown: shutdown.clone(),
    };

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let mut commands = triage_commands();
    commands.extend(broadcast_commands());

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands,
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord as {}", ready.user.name);
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    let result = tokio::select! {
        result = client.start() => result.map_err(BotError::from),
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
            Ok(())
        }
    };

    shutdown.cancel();
    client.shard_manager.shutdown_all().await;
    if let Err(e) = health_task.await {
        warn!("Health endpoint task ended abnormally: {e}");
    }

    result
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> EventResult {
    if let FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' failed for {}: {error}",
                ctx.command().name,
                ctx.author().tag()
            );
            let reply = CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!("Failed to report command error: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}
