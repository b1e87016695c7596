use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::persona_reply;
use crate::chat::ChatEngine;
use crate::persona::PersonaSelector;

/// Catch-all: any text (unknown commands included) is sent to the model in the current persona.
pub struct PersonaTextHandler {
    engine: ChatEngine,
    personas: PersonaSelector,
}

impl PersonaTextHandler {
    pub fn new(engine: ChatEngine, personas: PersonaSelector) -> Self {
        Self { engine, personas }
    }
}

#[async_trait]
impl Handler for PersonaTextHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.has_text() {
            return Ok(HandlerResponse::Ignore);
        }
        info!(message_content = %message.content, "step: generating reply");
        let text = persona_reply(&self.engine, &self.personas, &message.content).await?;
        Ok(HandlerResponse::Reply(text))
    }
}
