//! Persisted message records.
//!
//! The storage shape of a message, as returned by the Session Registry.
//! Several backend generations wrote these: field names vary between
//! snake_case and camelCase, ids are numbers or strings, and the
//! `semantic_sql` / `execution_result` / `debug_info` sub-fields may be
//! inline JSON or JSON serialized into a string. The normalizer turns a
//! record into an in-memory [`Message`](crate::session::Message).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserializes an id that may arrive as a JSON number or string.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

pub(crate) fn optional_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }))
}

/// A message as stored by the Session Registry.
///
/// Every field is optional; a record missing fields still normalizes to a
/// usable message rather than failing the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedMessageRecord {
    /// Storage-assigned id (numeric in the current backend).
    #[serde(default, deserialize_with = "optional_id_as_string")]
    pub id: Option<String>,
    /// "user" or "assistant".
    #[serde(default)]
    pub role: Option<String>,
    /// Message text.
    #[serde(default)]
    pub content: Option<String>,
    /// Creation timestamp (ISO 8601).
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    /// Semantic descriptor, inline or serialized into a string.
    #[serde(default, alias = "semanticSql")]
    pub semantic_sql: Option<Value>,
    /// Generated SQL text.
    #[serde(default, alias = "sqlQuery")]
    pub sql_query: Option<String>,
    /// Execution outcome, inline or serialized into a string.
    #[serde(default, alias = "executionResult")]
    pub execution_result: Option<Value>,
    /// Diagnostic payload, inline or serialized into a string.
    #[serde(default, alias = "debugInfo")]
    pub debug_info: Option<Value>,
}

impl From<&crate::session::Message> for PersistedMessageRecord {
    /// Projects an in-memory message back to its storage shape.
    ///
    /// Used when echoing messages into tests and when persisting locally
    /// constructed turns; sub-fields are stored inline, never re-wrapped
    /// into strings.
    fn from(message: &crate::session::Message) -> Self {
        Self {
            id: Some(message.id.clone()),
            role: Some(
                match message.role {
                    crate::session::MessageRole::User => "user",
                    crate::session::MessageRole::Assistant => "assistant",
                }
                .to_string(),
            ),
            content: Some(message.content.clone()),
            created_at: Some(message.created_at.clone()),
            semantic_sql: message
                .semantic_sql
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            sql_query: message.sql_query.clone(),
            execution_result: message
                .execution_result
                .as_ref()
                .and_then(|r| serde_json::to_value(r).ok()),
            debug_info: message
                .debug_info
                .as_ref()
                .and_then(|d| serde_json::to_value(d).ok()),
        }
    }
}
