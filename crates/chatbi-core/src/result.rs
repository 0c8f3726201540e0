//! Tabular query results.
//!
//! A [`TabularResult`] is the outcome of executing a SQL query: a success
//! flag plus either an ordered sequence of rows or an error message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a result set: column name to scalar value, in column order.
pub type ResultRow = Map<String, Value>;

/// The outcome of executing a SQL query.
///
/// Invariant: `success == false` implies `error` is set and `rows` is
/// absent or empty. Constructors uphold this; deserialized payloads are
/// taken as-is since they come from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularResult {
    /// Whether the query executed successfully.
    pub success: bool,
    /// Result rows, present on success. Older backends call this `data`.
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ResultRow>>,
    /// Number of rows returned.
    #[serde(
        default,
        alias = "rowCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub row_count: Option<u64>,
    /// Error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TabularResult {
    /// Creates a successful result from rows.
    pub fn ok(rows: Vec<ResultRow>) -> Self {
        let row_count = rows.len() as u64;
        Self {
            success: true,
            rows: Some(rows),
            row_count: Some(row_count),
            error: None,
        }
    }

    /// Creates a failed result carrying an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            rows: None,
            row_count: None,
            error: Some(error.into()),
        }
    }

    /// Returns true when the result carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.as_ref().map(|r| r.is_empty()).unwrap_or(true)
    }

    /// Column names of the result set, taken from the first row.
    ///
    /// All rows are assumed to share the column set of the first row,
    /// which is what the backend produces for a single SELECT.
    pub fn column_names(&self) -> Vec<String> {
        self.rows
            .as_ref()
            .and_then(|rows| rows.first())
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}
