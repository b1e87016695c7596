use async_trait::async_trait;
use rbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument, warn};

use crate::persona::PersonaSelector;

/// `/role <name>`: switches the persona. Only the first argument is used.
pub struct RoleHandler {
    personas: PersonaSelector,
}

impl RoleHandler {
    pub fn new(personas: PersonaSelector) -> Self {
        Self { personas }
    }
}

#[async_trait]
impl Handler for RoleHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let requested = message
            .command(None)
            .and_then(|c| c.args.into_iter().next());

        let Some(requested) = requested else {
            info!("step: /role without argument");
            return Ok(HandlerResponse::Reply(format!(
                "Please provide a role. Allowed roles: {}",
                self.personas.allowed_display()
            )));
        };

        let text = match self.personas.set_persona(&requested).await {
            Ok(persona) => format!("Role has been changed to: {}", persona),
            Err(e) => {
                warn!(requested = %e.requested, "Rejected role");
                format!("Invalid role. Allowed roles are: {}", e.allowed.join(", "))
            }
        };
        Ok(HandlerResponse::Reply(text))
    }
}
