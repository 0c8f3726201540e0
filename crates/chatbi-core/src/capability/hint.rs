//! Client-local remembered-session hint.

use crate::error::Result;
use async_trait::async_trait;

/// Client-local store for the remembered session id.
///
/// Advisory only, never authoritative: the conversation controller
/// consults it as the first recovery strategy on startup and falls
/// through when the remembered id no longer resolves via the registry.
#[async_trait]
pub trait SessionHintStore: Send + Sync {
    /// Returns the remembered session id, if any.
    async fn get_remembered_session(&self) -> Option<String>;

    /// Remembers a session id.
    async fn set_remembered_session(&self, session_id: &str) -> Result<()>;

    /// Forgets the remembered session id.
    async fn clear_remembered_session(&self) -> Result<()>;
}
