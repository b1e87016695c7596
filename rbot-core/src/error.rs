//! Error type for the bot core.

use thiserror::Error;

/// Failures of a single update: sending, handling, or generating the reply.
#[derive(Error, Debug)]
pub enum RbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

/// Result type for core operations; uses [`RbotError`].
pub type Result<T> = std::result::Result<T, RbotError>;
