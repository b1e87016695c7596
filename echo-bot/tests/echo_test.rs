//! Echo bot chain driven with fake messages and a recording Bot.
//!
//! External interactions: none (RecordingBot replaces Telegram).

use async_trait::async_trait;
use echo_bot::{build_echo_chain, echo_reply};
use rbot_core::{Bot, Chat, HandlerResponse, Message, User};
use rbot_telegram::dispatch_message;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> rbot_core::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }
}

fn text_message(content: &str) -> Message {
    Message::incoming_text(
        "1",
        User {
            id: 7,
            username: Some("alice".to_string()),
        },
        Chat { id: 42 },
        content,
    )
}

/// **Test: reply is exactly "You said: " + text for any text, commands included.**
#[tokio::test]
async fn echo_reply_is_prefix_plus_text() {
    let chain = build_echo_chain();
    for text in ["hello", "  spaced  ", "/start", "Привет 👋"] {
        let response = chain.handle(&text_message(text)).await.unwrap();
        assert_eq!(response, HandlerResponse::Reply(format!("You said: {}", text)));
    }
    assert_eq!(echo_reply("x"), "You said: x");
}

/// **Test: the runner sends the echo to the chat the message came from.**
#[tokio::test]
async fn echo_is_sent_to_origin_chat() {
    let bot = RecordingBot::default();
    dispatch_message(&build_echo_chain(), &bot, &text_message("ping"))
        .await
        .unwrap();

    let sent = bot.sent.lock().unwrap();
    assert_eq!(sent.as_slice(), &[(42, "You said: ping".to_string())]);
}

/// **Test: empty or whitespace-only text is not echoed and nothing is sent.**
#[tokio::test]
async fn blank_text_is_not_echoed() {
    let bot = RecordingBot::default();
    for text in ["", "   ", "\n\t"] {
        let response = dispatch_message(&build_echo_chain(), &bot, &text_message(text))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Continue);
    }
    assert!(bot.sent.lock().unwrap().is_empty());
}
