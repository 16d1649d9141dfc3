//! Table catalog wire types.
//!
//! Summaries for the sidebar (`GET /api/tables`) and per-table column detail
//! (`GET /api/table/{name}`).

use serde::{Deserialize, Serialize};

/// One entry in the table catalog listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u64,
}

impl TableInfo {
    /// Build a catalog entry.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: u32, rows: u64) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }
}

/// A single column in a table schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// SQL type name, e.g. `"INTEGER"` or `"VARCHAR"`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

impl ColumnInfo {
    /// Build a column descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable,
        }
    }
}

/// Full schema for one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Ordered column descriptors.
    pub columns: Vec<ColumnInfo>,
    /// Number of rows.
    pub row_count: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
