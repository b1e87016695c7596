use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::persona_reply;
use crate::chat::ChatEngine;
use crate::persona::PersonaSelector;

pub const REPLY_USAGE: &str = "Please use /reply as a reply to another text message.";

/// `/reply`: answers the replied-to message's text in the current persona.
pub struct PersonaReplyHandler {
    engine: ChatEngine,
    personas: PersonaSelector,
}

impl PersonaReplyHandler {
    pub fn new(engine: ChatEngine, personas: PersonaSelector) -> Self {
        Self { engine, personas }
    }
}

#[async_trait]
impl Handler for PersonaReplyHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(original) = message.replied_text() else {
            info!("step: /reply without a replied-to text");
            return Ok(HandlerResponse::Reply(REPLY_USAGE.to_string()));
        };
        info!(
            reply_to = ?message.reply_to_message_id,
            original_len = original.len(),
            "step: /reply generating"
        );
        let text = persona_reply(&self.engine, &self.personas, original).await?;
        Ok(HandlerResponse::Reply(text))
    }
}
