//! Session Registry trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use super::record::PersistedMessageRecord;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract registry for persisted chat sessions.
///
/// This trait defines the contract for listing, creating, renaming and
/// deleting sessions and for fetching a session's stored messages,
/// decoupling the conversation controller from the specific backend
/// (HTTP service, local store, test double).
///
/// Implementations own session identity; the client treats ids as opaque.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Lists all sessions, most recently updated first.
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Creates a session, optionally with a title.
    async fn create_session(&self, title: Option<&str>) -> Result<Session>;

    /// Renames a session.
    ///
    /// # Errors
    ///
    /// Returns [`ChatBiError::NotFound`](crate::ChatBiError::NotFound)
    /// when the session does not exist.
    async fn rename_session(&self, session_id: &str, title: &str) -> Result<Session>;

    /// Deletes (archives) a session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Fetches a session's stored messages in chat order.
    async fn session_messages(&self, session_id: &str) -> Result<Vec<PersistedMessageRecord>>;
}
