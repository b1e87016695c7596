//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries the text the runner sends back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; nothing is sent.
    Stop,
    /// This handler does not apply to the message, try next.
    Ignore,
    /// Stop the chain and send `text` to the chat of the incoming message.
    Reply(String),
}

impl HandlerResponse {
    /// Returns the reply text if this is a `Reply`.
    pub fn reply_text(&self) -> Option<&str> {
        match self {
            HandlerResponse::Reply(text) => Some(text.as_str()),
            _ => None,
        }
    }
}
