//! Conversion of Telegram updates into the core [`Message`] the handler chain reads.

use rbot_core::{Chat, Message, User};
use teloxide::types::Message as TgMessage;

/// Core user for a Telegram sender.
pub fn core_user(user: &teloxide::types::User) -> User {
    User {
        id: user.id.0 as i64,
        username: user.username.clone(),
    }
}

/// Core message for a Telegram text message; `None` for anything without text.
///
/// When the message answers another one, the replied-to id and text are attached so `/reply`
/// can feed that text to the model.
pub fn incoming_message(msg: &TgMessage) -> Option<Message> {
    let text = msg.text()?;
    let user = msg.from.as_ref().map(core_user).unwrap_or_else(User::unknown);
    let message = Message::incoming_text(msg.id.to_string(), user, Chat { id: msg.chat.id.0 }, text);

    Some(match msg.reply_to_message() {
        Some(replied) => {
            message.replying_to(replied.id.to_string(), replied.text().map(str::to_string))
        }
        None => message,
    })
}
