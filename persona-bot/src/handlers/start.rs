use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::info;

pub const START_TEXT: &str = "Hello! I am your friendly bot. How can I help you today?";

/// `/start`: greeting.
pub struct StartHandler;

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(user_id = message.user.id, chat_id = message.chat.id, "step: /start");
        Ok(HandlerResponse::Reply(START_TEXT.to_string()))
    }
}
