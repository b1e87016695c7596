//! # persona_bot
//!
//! Telegram bot that answers text through a local language model in a selectable persona.
//! Entry point: [`run_persona_bot`]. [`build_persona_chain`] gives the same chain without
//! Telegram, for driving with fake messages and a fake [`TextGenerator`](text_generation::TextGenerator).

mod assembly;
pub mod chat;
pub mod config;
mod facade;
pub mod handlers;
pub mod persona;

pub use assembly::build_persona_chain;
pub use chat::{format_reply, persona_label, ChatEngine, FALLBACK_REPLY};
pub use config::{parse_allowed_roles, PersonaBotConfig, DEFAULT_LOG_FILE};
pub use facade::run_persona_bot;
pub use persona::{EmptyAllowList, InvalidPersona, PersonaSelector};
