use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::info;

pub const HELP_TEXT: &str = "You can use the following commands:\n\
/start - Start the bot\n\
/help - Get help\n\
/role - Change the AI role\n\
/reply - Answer the message you reply to\n";

/// `/help`: lists the commands.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(user_id = message.user.id, chat_id = message.chat.id, "step: /help");
        Ok(HandlerResponse::Reply(HELP_TEXT.to_string()))
    }
}
