//! Database metadata capability.
//!
//! Consumed only to seed example suggestions and gate admin affordances;
//! connection CRUD and credential management live elsewhere.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A configured database connection, as the backend describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConnection {
    #[serde(deserialize_with = "crate::session::record::id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// A table within a connection's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_comment: Option<String>,
}

/// Read-only view of the backend's database catalog.
#[async_trait]
pub trait DatabaseMetadata: Send + Sync {
    /// Lists configured database connections.
    async fn list_connections(&self) -> Result<Vec<DatabaseConnection>>;

    /// Lists the tables of a connection, in catalog order.
    async fn list_tables(&self, connection_id: &str) -> Result<Vec<TableSummary>>;
}
