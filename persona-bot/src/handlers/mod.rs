//! Persona bot handlers. Commands are routed by name through a
//! [`CommandRouter`](handler_chain::CommandRouter); [`PersonaTextHandler`] answers everything else.
//!
//! Every handler returns `HandlerResponse::Reply(text)`; the runner sends it to the chat.

mod help;
mod reply;
mod role;
mod start;
mod text;

pub use help::{HelpHandler, HELP_TEXT};
pub use reply::{PersonaReplyHandler, REPLY_USAGE};
pub use role::RoleHandler;
pub use start::{StartHandler, START_TEXT};
pub use text::PersonaTextHandler;

use crate::chat::{format_reply, ChatEngine};
use crate::persona::PersonaSelector;
use rbot_core::RbotError;

/// Generates a labelled reply to `text`, reading the persona once so prompt and label agree.
pub(crate) async fn persona_reply(
    engine: &ChatEngine,
    personas: &PersonaSelector,
    text: &str,
) -> rbot_core::Result<String> {
    let persona = personas.current().await;
    let reply = engine
        .generate_reply(text, &persona)
        .await
        .map_err(|e| RbotError::Generation(e.to_string()))?;
    Ok(format_reply(&persona, &reply))
}
