//! # Configuration Module
//!
//! Environment-driven configuration for the bot and both AI backends.
//! Values are read once at startup; missing required values are fatal
//! before any polling begins.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Deadline for a single chat completion call, in seconds.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
/// Deadline for a single image generation call, in seconds. The remote API
/// blocks for the full generation time, so this is deliberately generous.
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 120;
/// Chat model used for completions and image prompt rewriting.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Telegram bot settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API token.
    pub token: String,
    /// Per-call deadline for chat completions.
    pub chat_timeout: Duration,
    /// Per-call deadline for image generation.
    pub image_timeout: Duration,
}

/// OpenAI backend settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

/// Replicate backend settings.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub token: String,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot: BotConfig,
    pub openai: OpenAiConfig,
    pub replicate: ReplicateConfig,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// Required: `BOT_TOKEN`, `OPENAI_API_KEY`, `REPLICATE_TOKEN`.
    /// Optional: `OPENAI_MODEL`, `CHAT_TIMEOUT_SECS`, `IMAGE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let token = env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        if token.trim().is_empty() {
            bail!("BOT_TOKEN must not be empty");
        }

        let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;
        let replicate_token =
            env::var("REPLICATE_TOKEN").context("REPLICATE_TOKEN must be set")?;

        let model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let chat_timeout =
            Duration::from_secs(secs_from_env("CHAT_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS));
        let image_timeout =
            Duration::from_secs(secs_from_env("IMAGE_TIMEOUT_SECS", DEFAULT_IMAGE_TIMEOUT_SECS));

        Ok(Self {
            bot: BotConfig {
                token,
                chat_timeout,
                image_timeout,
            },
            openai: OpenAiConfig { api_key, model },
            replicate: ReplicateConfig {
                token: replicate_token,
            },
        })
    }
}

/// Parses a positive seconds value from the environment, falling back to the
/// default on absence, parse failure or zero.
fn secs_from_env(name: &str, default: u64) -> u64 {
    match env::var(name).ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(secs) if secs > 0 => secs,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that default deadlines are within reasonable ranges
    #[test]
    fn test_default_timeouts_reasonable() {
        assert!(DEFAULT_CHAT_TIMEOUT_SECS > 0);
        assert!(DEFAULT_CHAT_TIMEOUT_SECS <= 60);

        // Image generation may legitimately take minutes
        assert!(DEFAULT_IMAGE_TIMEOUT_SECS >= DEFAULT_CHAT_TIMEOUT_SECS);
        assert!(DEFAULT_IMAGE_TIMEOUT_SECS <= 600);
    }

    #[test]
    fn test_default_model_not_empty() {
        assert!(!DEFAULT_CHAT_MODEL.is_empty());
    }
}
