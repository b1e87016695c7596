use rbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of handlers, asked in order until one returns Stop or Reply.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler. Order matters: earlier handlers get the first chance to reply.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs handlers in order until one returns Stop or Reply.
    /// Returns that response, or Continue when no handler answered.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(message_id = %message.id, "step: handler_chain started");

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "Handler processed");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(
                        handler = %name,
                        reply_len = ?response.reply_text().map(str::len),
                        "step: handler answered, chain stopped"
                    );
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => {}
            }
        }

        info!(message_id = %message.id, "step: handler_chain finished");
        Ok(final_response)
    }
}
