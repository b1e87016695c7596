//! Handler trait run by the handler chain.

use async_trait::async_trait;

use super::{message::Message, response::HandlerResponse};

/// One step of the chain. The chain calls handlers in order until one returns Stop or Reply.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Processes the message. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
}
