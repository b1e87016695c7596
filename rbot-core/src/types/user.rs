//! User identity type for core messages.

/// Sender of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

impl User {
    /// Placeholder for updates without a sender (e.g. channel posts).
    pub fn unknown() -> Self {
        Self {
            id: 0,
            username: None,
        }
    }
}
