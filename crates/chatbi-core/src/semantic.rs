//! Semantic query descriptors.
//!
//! A [`SemanticQueryDescriptor`] is the structured description the backend
//! produces alongside generated SQL: which tables, columns, filters,
//! aggregations and joins the query touches. It is descriptive metadata
//! only and is never executed directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    pub column: String,
    pub operator: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

/// An aggregation applied to a column, e.g. `SUM(amount)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAggregation {
    pub function: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A join between two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryJoin {
    #[serde(rename = "type")]
    pub join_type: String,
    pub table1: String,
    pub table2: String,
    pub condition: String,
}

/// An ordering clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOrdering {
    pub column: String,
    pub direction: String,
}

/// Structured metadata describing a generated query.
///
/// All collections default to empty so partially populated payloads from
/// older backends still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticQueryDescriptor {
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<QueryCondition>,
    #[serde(default)]
    pub aggregations: Vec<QueryAggregation>,
    #[serde(default)]
    pub joins: Vec<QueryJoin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<QueryOrdering>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}
