//! Entry point of the persona bot: [`run_persona_bot`].

use anyhow::{Context, Result};
use chrono::Local;
use rbot_telegram::{build_bot, run_repl, TelegramBotAdapter, TelegramConfig};
use std::sync::Arc;
use text_generation::{CandleGenerator, ModelConfig, TextGenerator};
use tokio::sync::RwLock;
use tracing::info;

use crate::assembly::build_persona_chain;
use crate::chat::ChatEngine;
use crate::config::PersonaBotConfig;
use crate::persona::PersonaSelector;

/// Loads the model, builds the chain and runs the REPL until the process is stopped.
/// Tracing must already be initialized.
pub async fn run_persona_bot(
    telegram: TelegramConfig,
    settings: PersonaBotConfig,
    model: ModelConfig,
) -> Result<()> {
    let personas = PersonaSelector::new(settings.allowed_roles.clone(), settings.default_role.as_deref())?;
    let current = personas.current().await;
    info!(allowed = %personas.allowed_display(), current = %current, "Personas configured");

    let generator = tokio::task::spawn_blocking(move || CandleGenerator::load(&model))
        .await
        .context("Model loading task failed")??;
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);
    let engine = ChatEngine::new(generator).with_max_tokens(settings.max_tokens);

    let bot = build_bot(&telegram)?;
    let reply_bot = Arc::new(TelegramBotAdapter::new(bot.clone()));
    let bot_username = Arc::new(RwLock::new(None));
    let chain = build_persona_chain(engine, personas, bot_username.clone());

    info!(
        start_time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        max_tokens = settings.max_tokens,
        "Persona Bot started"
    );
    run_repl(bot, chain, reply_bot, bot_username).await
}
