//! Assembly: wires personas, the chat engine and the handlers into one chain. Used by the [facade](crate::facade).

use handler_chain::{CommandRouter, HandlerChain};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::chat::ChatEngine;
use crate::handlers::{HelpHandler, PersonaReplyHandler, PersonaTextHandler, RoleHandler, StartHandler};
use crate::persona::PersonaSelector;

/// Router for `/start`, `/help`, `/role`, `/reply`, then the catch-all text handler.
pub fn build_persona_chain(
    engine: ChatEngine,
    personas: PersonaSelector,
    bot_username: Arc<RwLock<Option<String>>>,
) -> HandlerChain {
    let router = CommandRouter::new(bot_username)
        .route("start", Arc::new(StartHandler))
        .route("help", Arc::new(HelpHandler))
        .route("role", Arc::new(RoleHandler::new(personas.clone())))
        .route(
            "reply",
            Arc::new(PersonaReplyHandler::new(engine.clone(), personas.clone())),
        );
    info!(commands = ?router.commands(), "Commands registered");

    HandlerChain::new()
        .add_handler(Arc::new(router))
        .add_handler(Arc::new(PersonaTextHandler::new(engine, personas)))
}
