//! # Text generation
//!
//! Defines the [`TextGenerator`] trait and a candle implementation that runs a causal language
//! model loaded from a local directory. Transport-agnostic; used by persona-bot.
//!
//! A generator receives a [`GenerationRequest`] (system prompt, user prompt, total length cap),
//! renders it with the model's chat template and returns a [`Completion`]: the rendered prompt
//! and the decoded sequence, which still begins with the prompt. Callers remove the echo with
//! [`strip_echo`].

use async_trait::async_trait;

mod candle_generator;
mod config;
mod decode;
mod error;

pub use candle_generator::CandleGenerator;
pub use config::{ModelConfig, ModelDType, ModelFiles};
pub use decode::{generate_tokens, trim_stop_token, StepModel};
pub use error::GenerationError;

/// Default cap on the total sequence length (prompt tokens + generated tokens).
pub const DEFAULT_MAX_TOKENS: usize = 128;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 1.15;

/// Default sampling seed.
pub const DEFAULT_SEED: u64 = 299_792_458;

/// One generation: built per incoming message and consumed by [`TextGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Cap on prompt + generated tokens; a prompt that already fills it is rejected.
    pub max_tokens: usize,
}

impl GenerationRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The system + user exchange to render with a chat template.
    pub fn messages(&self) -> Vec<prompt::ChatMessage> {
        prompt::exchange(&self.system_prompt, &self.user_prompt)
    }
}

/// Sampling settings. `do_sample = false` means greedy decoding and ignores `temperature`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub do_sample: bool,
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            do_sample: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl SamplingConfig {
    /// Temperature handed to the logits processor; `None` selects argmax.
    pub fn effective_temperature(&self) -> Option<f64> {
        if self.do_sample && self.temperature > 0.0 {
            Some(self.temperature)
        } else {
            None
        }
    }
}

/// Output of a generator: the prompt and the decoded sequence (prompt echo included), both as the
/// tokenizer decodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub prompt: String,
    pub text: String,
}

impl Completion {
    /// Decoded text with the prompt echo removed.
    pub fn reply(&self) -> String {
        strip_echo(&self.text, &self.prompt)
    }
}

/// Text generation interface. Implementations may block internally but must not block the async runtime.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError>;
}

/// Removes every occurrence of `prompt` from `output`.
///
/// Repeats until none is left, so the result never starts with (or contains) the prompt.
pub fn strip_echo(output: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return output.to_string();
    }
    let mut text = output.to_string();
    while text.contains(prompt) {
        text = text.replace(prompt, "");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_echo_removes_prefix() {
        assert_eq!(strip_echo("PROMPTanswer", "PROMPT"), "answer");
    }

    #[test]
    fn test_strip_echo_without_echo_is_identity() {
        assert_eq!(strip_echo("answer", "PROMPT"), "answer");
        assert_eq!(strip_echo("answer", ""), "answer");
    }

    #[test]
    fn test_strip_echo_repeated_and_nested() {
        assert_eq!(strip_echo("PROMPTPROMPTanswer", "PROMPT"), "answer");
        // Removing the inner copy joins "PRO" + "MPT" into a new one; it is removed as well.
        let out = strip_echo("PROPROMPTMPTanswer", "PROMPT");
        assert_eq!(out, "answer");
        assert!(!out.starts_with("PROMPT"));
    }

    #[test]
    fn test_strip_echo_keeps_text_around_special_prefix() {
        assert_eq!(strip_echo("<s>PROMPT hi", "PROMPT"), "<s> hi");
    }

    #[test]
    fn test_sampling_defaults() {
        let s = SamplingConfig::default();
        assert_eq!(s.temperature, 1.15);
        assert!(s.do_sample);
        assert_eq!(s.effective_temperature(), Some(1.15));

        let greedy = SamplingConfig {
            do_sample: false,
            ..s
        };
        assert_eq!(greedy.effective_temperature(), None);
    }

    #[test]
    fn test_request_defaults_and_messages() {
        let r = GenerationRequest::new("You act like a @a.", "hi");
        assert_eq!(r.max_tokens, 128);
        assert_eq!(r.clone().with_max_tokens(64).max_tokens, 64);

        let m = r.messages();
        assert_eq!(m[0], prompt::ChatMessage::system("You act like a @a."));
        assert_eq!(m[1], prompt::ChatMessage::user("hi"));
    }

    #[test]
    fn test_completion_reply() {
        let c = Completion {
            prompt: "<|user|>\nhi</s>\n<|assistant|>\n".to_string(),
            text: "<|user|>\nhi</s>\n<|assistant|>\nhello".to_string(),
        };
        assert_eq!(c.reply(), "hello");
    }
}
