//! Query request/response wire types.
//!
//! These are the JSON bodies of `POST /api/query`. Row cells are loosely
//! typed (`serde_json::Value`) because the engine reports heterogeneous
//! columns (ints, strings) without a schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/query`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Raw query text.
    pub query: String,
}

/// Result of executing (or classifying) a query.
///
/// `columns` and `rows` are present only for row-returning queries and are
/// omitted from the JSON entirely when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Whether execution succeeded.
    pub success: bool,
    /// Human-readable status or error message.
    pub message: String,
    /// Engine-reported execution time, e.g. `"3ms"`.
    pub execution_time: String,
    /// Column names for row-returning queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Row data, one `Vec<Value>` per row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<Value>>>,
}

impl QueryResult {
    /// A successful result with no row data.
    #[must_use]
    pub fn success(message: impl Into<String>, execution_time: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            execution_time: execution_time.into(),
            columns: None,
            rows: None,
        }
    }

    /// A failed result with no row data.
    #[must_use]
    pub fn failure(message: impl Into<String>, execution_time: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            execution_time: execution_time.into(),
            columns: None,
            rows: None,
        }
    }

    /// Attach column names and row data.
    #[must_use]
    pub fn with_rows(mut self, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        self.columns = Some(columns);
        self.rows = Some(rows);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
