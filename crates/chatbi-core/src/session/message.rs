//! Conversation message types.
//!
//! This module contains types for representing one turn in a session's
//! transcript, including roles and the optional query artifacts an
//! assistant turn carries.

use crate::debug::DebugBundle;
use crate::result::TabularResult;
use crate::semantic::SemanticQueryDescriptor;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// A single message in a session's transcript.
///
/// User messages carry only text. Assistant messages may additionally
/// carry the semantic query descriptor and SQL the backend generated,
/// the execution result once the SQL has run, and a diagnostic bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
    /// Structured description of the generated query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_sql: Option<SemanticQueryDescriptor>,
    /// The generated SQL text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    /// Outcome of executing `sql_query`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_result: Option<TabularResult>,
    /// Diagnostic payload for this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugBundle>,
}

impl Message {
    /// Creates a user message with a fresh id and current timestamp.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message with a fresh id and current timestamp.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            semantic_sql: None,
            sql_query: None,
            execution_result: None,
            debug_info: None,
        }
    }

    /// Returns a mutable handle to the debug bundle, creating it if absent.
    pub fn debug_info_mut(&mut self) -> &mut DebugBundle {
        self.debug_info.get_or_insert_with(DebugBundle::default)
    }
}
