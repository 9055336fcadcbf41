use std::{env, str::FromStr, time::Duration};

use log::{debug, error, info, warn};
use poise::serenity_prelude::ChannelId;

use crate::delivery::DeliveryMode;
use crate::error::{BotError, Result};
use crate::triage::TriggerPolicy;

const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_BROADCAST_COUNT: u32 = 100;
const DEFAULT_BROADCAST_INTERVAL_MS: u64 = 1000;

/// Lower bound on broadcast pacing.
pub const MIN_BROADCAST_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_PERSONA: &str = "You are the Chillax Theme Expert. Provide Vencord CSS snippets. \
     FAQ: https://chillax.inmoresentum.net/vencordfaq.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub persona_prompt: String,
    pub trigger_policy: TriggerPolicy,
    pub delivery_mode: DeliveryMode,
    pub operator_channel: Option<ChannelId>,
    pub health_port: u16,
    pub broadcast_count: u32,
    pub broadcast_interval: Duration,
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    ///
    /// # Errors
    ///
    /// Returns an error if a required credential is missing or an optional
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns an error if a required credential is missing or an optional
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = required_var(&lookup, "DISCORD_TOKEN")?;
        let openrouter_api_key = required_var(&lookup, "OPENROUTER_API_KEY")?;

        let openrouter_model = optional_var(&lookup, "OPENROUTER_MODEL")
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let persona_prompt = optional_var(&lookup, "PERSONA_PROMPT")
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        let trigger_policy: TriggerPolicy =
            parse_var(&lookup, "TRIGGER_POLICY")?.unwrap_or_default();
        let delivery_mode: DeliveryMode = parse_var(&lookup, "DELIVERY_MODE")?.unwrap_or_default();
        let operator_channel = parse_var::<u64, _>(&lookup, "OPERATOR_CHANNEL_ID")?
            .filter(|&id| id != 0)
            .map(ChannelId::new);
        let health_port = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let broadcast_count =
            parse_var(&lookup, "BROADCAST_COUNT")?.unwrap_or(DEFAULT_BROADCAST_COUNT);
        let broadcast_interval = broadcast_interval(
            parse_var(&lookup, "BROADCAST_INTERVAL_MS")?.unwrap_or(DEFAULT_BROADCAST_INTERVAL_MS),
        );

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!(
            "OpenRouter API key length: {} characters",
            openrouter_api_key.len()
        );
        debug!("OpenRouter model: {openrouter_model}");
        debug!("Persona prompt length: {} characters", persona_prompt.len());
        debug!("Trigger policy: {trigger_policy}, delivery mode: {delivery_mode}");

        Ok(Self {
            discord_token,
            openrouter_api_key,
            openrouter_model,
            persona_prompt,
            trigger_policy,
            delivery_mode,
            operator_channel,
            health_port,
            broadcast_count,
            broadcast_interval,
        })
    }
}

/// Broadcast pacing for `interval_ms`, never faster than
/// [`MIN_BROADCAST_INTERVAL`].
#[must_use]
pub fn broadcast_interval(interval_ms: u64) -> Duration {
    let interval = Duration::from_millis(interval_ms);
    if interval < MIN_BROADCAST_INTERVAL {
        warn!(
            "BROADCAST_INTERVAL_MS={interval_ms} is below the platform rate ceiling, using {}ms",
            MIN_BROADCAST_INTERVAL.as_millis()
        );
        return MIN_BROADCAST_INTERVAL;
    }
    interval
}

fn required_var<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional_var(lookup, name).ok_or_else(|| {
        error!("Failed to load {name} from environment");
        BotError::EnvVar(env::VarError::NotPresent)
    })
}

fn optional_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    optional_var(lookup, name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                error!("Invalid value for {name}: {e}");
                BotError::Config(format!("invalid {name} '{raw}': {e}"))
            })
        })
        .transpose()
}
