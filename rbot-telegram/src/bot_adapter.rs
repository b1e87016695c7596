//! Wraps teloxide::Bot and implements [`rbot_core::Bot`]. Production code sends messages via Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use rbot_core::{Bot as CoreBot, Chat, Message, RbotError, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ReplyParameters};
use tracing::{error, warn};

/// Thin wrapper around teloxide::Bot that implements rbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| {
                error!(chat_id = chat.id, error = %e, "Failed to send message");
                RbotError::Bot(e.to_string())
            })?;
        Ok(())
    }

    /// Sends `text` as a reply quoting `message`; falls back to a plain send when the id is not a Telegram one.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let Ok(id) = message.id.parse::<i32>() else {
            warn!(message_id = %message.id, "Not a Telegram message id, sending without quote");
            return self.send_message(&message.chat, text).await;
        };
        self.bot
            .send_message(ChatId(message.chat.id), text.to_string())
            .reply_parameters(ReplyParameters::new(MessageId(id)))
            .await
            .map_err(|e| {
                error!(chat_id = message.chat.id, error = %e, "Failed to send reply");
                RbotError::Bot(e.to_string())
            })?;
        Ok(())
    }
}
