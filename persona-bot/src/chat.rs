//! Prompt-and-generate: persona + user text in, reply text out.

use prompt::persona_system_prompt;
use std::sync::Arc;
use text_generation::{GenerationError, GenerationRequest, TextGenerator, DEFAULT_MAX_TOKENS};
use tracing::{info, instrument, warn};

/// Sent instead of a reply when the model rejects the input.
pub const FALLBACK_REPLY: &str = "Oops, I can not process that.";

/// Builds requests for the generator and cleans up its output.
#[derive(Clone)]
pub struct ChatEngine {
    generator: Arc<dyn TextGenerator>,
    max_tokens: usize,
}

impl ChatEngine {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Request for `user_text` spoken to `persona`.
    pub fn request(&self, user_text: &str, persona: &str) -> GenerationRequest {
        GenerationRequest::new(persona_system_prompt(persona), user_text)
            .with_max_tokens(self.max_tokens)
    }

    /// Generates a reply; returns the typed error without substitution.
    #[instrument(skip(self, user_text), fields(persona = %persona, max_tokens = self.max_tokens))]
    pub async fn try_generate(
        &self,
        user_text: &str,
        persona: &str,
    ) -> Result<String, GenerationError> {
        let completion = self.generator.generate(self.request(user_text, persona)).await?;
        let reply = completion.reply();
        info!(reply_len = reply.len(), "step: reply generated");
        Ok(reply)
    }

    /// Like [`try_generate`](Self::try_generate), but input the model rejects yields [`FALLBACK_REPLY`].
    pub async fn generate_reply(
        &self,
        user_text: &str,
        persona: &str,
    ) -> Result<String, GenerationError> {
        match self.try_generate(user_text, persona).await {
            Err(GenerationError::InvalidInput(reason)) => {
                warn!(reason = %reason, "Model rejected input, sending fallback");
                Ok(FALLBACK_REPLY.to_string())
            }
            other => other,
        }
    }
}

/// Persona label shown above replies: the persona without `@`.
pub fn persona_label(persona: &str) -> String {
    persona.replace('@', "")
}

/// `[label]\nreply`
pub fn format_reply(persona: &str, reply: &str) -> String {
    format!("[{}]\n{}", persona_label(persona), reply)
}
