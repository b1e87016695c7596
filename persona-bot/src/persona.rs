//! Active persona: one process-wide value, chosen from a fixed allow-list.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Requested persona is not in the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid role '{requested}'. Allowed roles are: {}", .allowed.join(", "))]
pub struct InvalidPersona {
    pub requested: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Allowed roles list is empty")]
pub struct EmptyAllowList;

/// Holds the current persona and the allow-list it is validated against.
///
/// Clones share the same persona cell, so every handler sees a change made by `/role`.
#[derive(Debug, Clone)]
pub struct PersonaSelector {
    allowed: Arc<Vec<String>>,
    current: Arc<RwLock<String>>,
}

impl PersonaSelector {
    /// Starts with `default` when it is allowed (case-insensitive), else with the first allowed entry.
    pub fn new(allowed: Vec<String>, default: Option<&str>) -> Result<Self, EmptyAllowList> {
        let first = allowed.first().cloned().ok_or(EmptyAllowList)?;
        let initial = default
            .and_then(|d| find_allowed(&allowed, d))
            .unwrap_or(first);
        Ok(Self {
            allowed: Arc::new(allowed),
            current: Arc::new(RwLock::new(initial)),
        })
    }

    /// Snapshot of the current persona.
    pub async fn current(&self) -> String {
        self.current.read().await.clone()
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Allow-list joined with `", "`, as shown to users.
    pub fn allowed_display(&self) -> String {
        self.allowed.join(", ")
    }

    /// Switches to `requested` if allowed and returns the stored (allow-list) spelling.
    /// On error the current persona is left as it was.
    pub async fn set_persona(&self, requested: &str) -> Result<String, InvalidPersona> {
        let canonical =
            find_allowed(&self.allowed, requested).ok_or_else(|| InvalidPersona {
                requested: requested.to_string(),
                allowed: self.allowed.to_vec(),
            })?;
        let mut current = self.current.write().await;
        info!(from = %*current, to = %canonical, "Persona changed");
        *current = canonical.clone();
        Ok(canonical)
    }
}

fn find_allowed(allowed: &[String], name: &str) -> Option<String> {
    let wanted = name.trim().to_lowercase();
    allowed.iter().find(|a| a.to_lowercase() == wanted).cloned()
}
