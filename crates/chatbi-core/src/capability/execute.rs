//! SQL execution capability.

use crate::error::Result;
use crate::result::TabularResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request sent to the execution backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// The SQL to run.
    #[serde(rename = "sql_query")]
    pub sql: String,
    /// The session the execution belongs to.
    #[serde(
        rename = "conversation_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
    /// The database connection to run against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_connection_id: Option<String>,
}

/// External service executing generated SQL.
#[async_trait]
pub trait ExecutionCapability: Send + Sync {
    /// Executes SQL and returns the tabular outcome.
    ///
    /// A query that fails inside the database still resolves `Ok` with
    /// `success == false`; `Err` means the call itself failed.
    async fn execute(&self, request: &ExecutionRequest) -> Result<TabularResult>;
}
