//! Minimal framework config: token, optional API URL and log file path.
//! Loaded from env: TELEGRAM_BOT_TOKEN (or BOT_TOKEN), TELEGRAM_API_URL (or TELOXIDE_API_URL), LOG_FILE.

use anyhow::{Context, Result};
use std::env;

/// Minimal Telegram bot config (connectivity and logging only).
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
}

impl TelegramConfig {
    /// Loads from env. `token` (e.g. from a CLI flag) overrides TELEGRAM_BOT_TOKEN / BOT_TOKEN.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("TELEGRAM_BOT_TOKEN")
                .or_else(|_| env::var("BOT_TOKEN"))
                .context("TELEGRAM_BOT_TOKEN not set")?,
        };
        if bot_token.trim().is_empty() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN is empty");
        }
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        let log_file = env::var("LOG_FILE").ok().filter(|s| !s.trim().is_empty());
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    /// Builds config with the given token; other fields None.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: None,
        }
    }

    /// Log file path, or `default` when LOG_FILE is not set.
    pub fn log_file_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.log_file.as_deref().unwrap_or(default)
    }
}

/// Creates the teloxide Bot, pointing it at `telegram_api_url` when set (e.g. a mock server).
pub fn build_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    match &config.telegram_api_url {
        Some(url) => {
            let url = reqwest::Url::parse(url)
                .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}
