//! # Prompt
//!
//! Builds the text a causal language model is conditioned on.
//!
//! - [`ChatMessage`] / [`MessageRole`]: one role-tagged turn of a conversation.
//! - [`exchange`]: the two-turn input of one generation (system + user).
//! - [`ChatTemplate`]: renders turns in a model family's chat format, with the assistant
//!   generation prompt appended.
//!
//! ## External interactions
//!
//! - **Language models**: the rendered string is tokenized and fed to the model by `text-generation`.

mod template;

pub use template::{ChatTemplate, TemplateError};

/// Role of a message in a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction.
    System,
    /// User message.
    User,
    /// Assistant (model) message.
    Assistant,
}

impl MessageRole {
    /// Lowercase role name as used inside chat templates (`system`, `user`, `assistant`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// System instruction that makes the model act as `persona`: `You act like a {persona}.`
pub fn persona_system_prompt(persona: &str) -> String {
    format!("You act like a {}.", persona)
}

/// Two-message exchange for one generation: system instruction then user text.
pub fn exchange(system_prompt: &str, user_text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(user_text)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_system_prompt() {
        assert_eq!(persona_system_prompt("@b"), "You act like a @b.");
    }

    #[test]
    fn test_exchange_order() {
        let messages = exchange(&persona_system_prompt("@ZoneTwelve"), "What's for lunch?");
        assert_eq!(
            messages,
            vec![
                ChatMessage::system("You act like a @ZoneTwelve."),
                ChatMessage::user("What's for lunch?"),
            ]
        );
    }

    #[test]
    fn test_role_names() {
        assert_eq!(MessageRole::System.as_str(), "system");
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }
}
