//! Incoming message type for the core model.

use super::{chat::Chat, command::Command, user::User};

/// A single message with user, chat, content, and optional reply context.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub reply_to_message_id: Option<String>,
    /// Text of the replied-to message; `/reply` feeds it to the model.
    pub reply_to_message_content: Option<String>,
}

impl Message {
    /// Builds an incoming text message; reply context is empty.
    pub fn incoming_text(id: impl Into<String>, user: User, chat: Chat, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user,
            chat,
            content: content.into(),
            reply_to_message_id: None,
            reply_to_message_content: None,
        }
    }

    /// Attaches reply context (the message this one answers).
    pub fn replying_to(mut self, message_id: impl Into<String>, content: Option<String>) -> Self {
        self.reply_to_message_id = Some(message_id.into());
        self.reply_to_message_content = content;
        self
    }

    /// True when the message carries non-empty text.
    pub fn has_text(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Parses the content as a bot command. See [`Command::parse`].
    pub fn command(&self, bot_username: Option<&str>) -> Option<Command> {
        Command::parse(&self.content, bot_username)
    }

    /// Text of the replied-to message, if any and non-empty.
    pub fn replied_text(&self) -> Option<&str> {
        self.reply_to_message_content
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}
