//! # echo_bot
//!
//! Replies to every text message with `You said: <text>`. Entry point: [`run_echo_bot`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use handler_chain::HandlerChain;
use rbot_core::{Handler, HandlerResponse, Message};
use rbot_telegram::{build_bot, run_repl, TelegramBotAdapter, TelegramConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

/// Default log file when LOG_FILE is not set.
pub const DEFAULT_LOG_FILE: &str = "logs/echo-bot.log";

/// Builds the echo reply for `text`.
pub fn echo_reply(text: &str) -> String {
    format!("You said: {}", text)
}

/// Replies to any text message (commands included) with [`echo_reply`].
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> rbot_core::Result<HandlerResponse> {
        if !message.has_text() {
            return Ok(HandlerResponse::Ignore);
        }
        info!(message_content = %message.content, "Echoing message");
        Ok(HandlerResponse::Reply(echo_reply(&message.content)))
    }
}

/// The echo bot's chain: a single [`EchoHandler`].
pub fn build_echo_chain() -> HandlerChain {
    HandlerChain::new().add_handler(Arc::new(EchoHandler))
}

/// Runs the echo bot until the process is stopped. Tracing must already be initialized.
pub async fn run_echo_bot(config: TelegramConfig) -> Result<()> {
    let bot = build_bot(&config)?;
    let reply_bot = Arc::new(TelegramBotAdapter::new(bot.clone()));
    info!(
        start_time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        "Echo Bot started"
    );
    run_repl(bot, build_echo_chain(), reply_bot, Arc::new(RwLock::new(None))).await
}
