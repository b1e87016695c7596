//! # rbot-telegram
//!
//! Telegram layer: conversion of teloxide messages, [`rbot_core::Bot`] implementation, minimal
//! config, and the REPL runner that feeds each update to a [`handler_chain::HandlerChain`] and
//! sends the reply. No persona or model logic lives here.

mod bot_adapter;
mod config;
mod incoming;
mod runner;

pub use bot_adapter::TelegramBotAdapter;
pub use config::{build_bot, TelegramConfig};
pub use incoming::{core_user, incoming_message};
pub use runner::{dispatch_message, run_repl};
