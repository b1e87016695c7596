//! Chat identity type for core messages.

/// Chat (group or private) a message belongs to; replies go back to `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
}
