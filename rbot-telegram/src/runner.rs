//! REPL runner: converts teloxide messages to core::Message, runs the HandlerChain in a spawned
//! task per update and sends the chain's reply back to the chat.

use anyhow::Result;
use handler_chain::HandlerChain;
use rbot_core::{Bot as CoreBot, HandlerResponse, Message};
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use super::incoming::incoming_message;

/// Runs the chain for one message and sends the reply (if any) through `bot`.
///
/// Errors from handlers or from sending are returned; the runner logs them for that update only.
#[instrument(skip(chain, bot, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
pub async fn dispatch_message(
    chain: &HandlerChain,
    bot: &dyn CoreBot,
    message: &Message,
) -> rbot_core::Result<HandlerResponse> {
    let response = chain.handle(message).await?;
    if let HandlerResponse::Reply(text) = &response {
        bot.reply_to(message, text).await?;
        info!(message_id = %message.id, reply_len = text.len(), "step: reply sent");
    }
    Ok(response)
}

/// Starts the REPL with the given teloxide Bot and HandlerChain.
///
/// Calls get_me() first and writes the username into `bot_username` (used by the command router
/// for `/cmd@bot` forms). Each text message is converted to core::Message and dispatched in its own
/// task, so a slow generation only delays the update that triggered it.
#[instrument(skip(bot, handler_chain, reply_bot, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    reply_bot: Arc<dyn CoreBot>,
    bot_username: Arc<RwLock<Option<String>>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Bot username set before repl");
            }
        }
        Err(e) => error!(error = %e, "get_me failed; /cmd@bot forms will not be checked"),
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let reply_bot = reply_bot.clone();

        async move {
            let Some(core_msg) = incoming_message(&msg) else {
                info!(chat_id = msg.chat.id.0, "Received non-text message, ignored");
                return respond(());
            };

            info!(
                user_id = core_msg.user.id,
                username = ?core_msg.user.username,
                chat_id = core_msg.chat.id,
                message_content = %core_msg.content,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = dispatch_message(&chain, reply_bot.as_ref(), &core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            respond(())
        }
    })
    .await;

    Ok(())
}
