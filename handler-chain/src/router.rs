use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Routes `/name ...` messages to the handler registered for `name`.
///
/// Messages that are not commands, commands addressed to another bot, and unregistered command
/// names return `Ignore`, so the next handler in the chain (usually the plain-text handler) gets them.
#[derive(Clone)]
pub struct CommandRouter {
    /// Filled by the runner after `get_me`; used to accept `/cmd@this_bot` and reject `/cmd@other_bot`.
    bot_username: Arc<RwLock<Option<String>>>,
    routes: BTreeMap<String, Arc<dyn Handler>>,
}

impl CommandRouter {
    pub fn new(bot_username: Arc<RwLock<Option<String>>>) -> Self {
        Self {
            bot_username,
            routes: BTreeMap::new(),
        }
    }

    /// Registers `handler` for the command `name` (leading `/` optional, case-insensitive).
    pub fn route(mut self, name: &str, handler: Arc<dyn Handler>) -> Self {
        let key = name.trim_start_matches('/').to_ascii_lowercase();
        self.routes.insert(key, handler);
        self
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// Returns the handler for `message` if it is a registered command.
    pub async fn resolve(&self, message: &Message) -> Option<Arc<dyn Handler>> {
        let username = self.bot_username.read().await.clone();
        let command = message.command(username.as_deref())?;
        self.routes.get(&command.name).cloned()
    }
}

#[async_trait]
impl Handler for CommandRouter {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match self.resolve(message).await {
            Some(handler) => {
                info!(
                    user_id = message.user.id,
                    command = %message.content.split_whitespace().next().unwrap_or_default(),
                    "step: command routed"
                );
                handler.handle(message).await
            }
            None => {
                debug!(user_id = message.user.id, "Not a registered command");
                Ok(HandlerResponse::Ignore)
            }
        }
    }
}
