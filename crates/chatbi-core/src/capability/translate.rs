//! Natural-language to SQL translation capability.

use crate::error::Result;
use crate::semantic::SemanticQueryDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request sent to the translation backend.
///
/// Wire field names follow the backend's chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateRequest {
    /// The user's natural-language question.
    #[serde(rename = "message")]
    pub text: String,
    /// The session the question belongs to.
    #[serde(
        rename = "conversation_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
    /// The database connection to translate against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_connection_id: Option<String>,
}

/// Response from the translation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    /// Natural-language answer text.
    #[serde(rename = "response", alias = "responseText")]
    pub response_text: String,
    /// Generated SQL, when the question translated to a query.
    #[serde(default, alias = "sqlQuery", skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    /// Structured description of the generated query.
    #[serde(
        default,
        alias = "semanticSql",
        skip_serializing_if = "Option::is_none"
    )]
    pub semantic_sql: Option<SemanticQueryDescriptor>,
    /// The session the backend attributed the turn to.
    #[serde(
        rename = "conversation_id",
        alias = "sessionId",
        default,
        deserialize_with = "crate::session::record::optional_id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
    /// Model-level diagnostics. An older backend called this
    /// `debug_ollama`.
    #[serde(
        default,
        alias = "debug_ollama",
        alias = "modelDebug",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_debug: Option<Value>,
}

/// External service turning natural language into SQL plus semantic
/// metadata.
#[async_trait]
pub trait TranslationCapability: Send + Sync {
    /// Translates a natural-language question.
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse>;
}
