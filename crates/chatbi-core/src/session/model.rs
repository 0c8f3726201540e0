//! Session domain model.

use serde::{Deserialize, Serialize};

/// A persisted, named conversation thread.
///
/// Sessions are owned by the Session Registry; the client never invents
/// session identity. Exactly one session is "active" at a time in the
/// client, tracked by the conversation controller.
///
/// Ids are opaque strings. The current backend issues numeric ids and an
/// older one issued UUIDs; treating them as strings keeps the client
/// agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    #[serde(deserialize_with = "crate::session::record::id_as_string")]
    pub id: String,
    /// Human-readable session title.
    #[serde(default)]
    pub title: String,
    /// Timestamp when the session was created (ISO 8601 format).
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format).
    #[serde(default, alias = "updatedAt")]
    pub updated_at: String,
}
