use thiserror::Error;

/// Generation failures, split so callers can tell "the model declined this input" from the rest.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The input failed value validation (empty after tokenization, or longer than the length cap).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Model error: {0}")]
    Model(String),

    /// The blocking inference task panicked or the model lock was poisoned.
    #[error("Generation worker failed: {0}")]
    Worker(String),
}

impl GenerationError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GenerationError::InvalidInput(_))
    }
}

impl From<candle_core::Error> for GenerationError {
    fn from(e: candle_core::Error) -> Self {
        GenerationError::Model(e.to_string())
    }
}

impl From<tokenizers::Error> for GenerationError {
    fn from(e: tokenizers::Error) -> Self {
        GenerationError::Tokenizer(e.to_string())
    }
}
