//! # rbot-core
//!
//! Core types and traits shared by the echo bot and the persona bot: [`Bot`], [`Handler`],
//! [`Message`], [`Command`], errors and tracing initialization. Transport-agnostic; the Telegram
//! layer lives in `rbot-telegram`.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{RbotError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Command, Handler, HandlerResponse, Message, User};
