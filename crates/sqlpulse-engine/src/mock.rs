//! The demo engine: prefix classification with canned results.
//!
//! Matches on the trimmed, upper-cased query text, so classification is
//! case-insensitive and tolerant of surrounding whitespace. Anything that is
//! not one of the four recognized statement shapes fails with
//! "Unknown query type".

use async_trait::async_trait;
use serde_json::json;
use sqlpulse_core::query::QueryResult;
use sqlpulse_core::tables::{ColumnInfo, TableInfo, TableSchema};

use crate::QueryEngine;

/// Demo backend with canned classification results and a fixed catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockEngine;

impl MockEngine {
    /// Create a mock engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn classify(query: &str) -> QueryResult {
        let normalized = query.trim().to_uppercase();

        if normalized.starts_with("CREATE TABLE") {
            return QueryResult::success("Table created successfully", "2ms");
        }

        if normalized.starts_with("INSERT INTO") {
            return QueryResult::success("1 row inserted", "1ms");
        }

        if normalized.starts_with("SELECT") {
            return QueryResult::success("Query executed successfully", "3ms").with_rows(
                vec!["id".into(), "name".into(), "age".into()],
                vec![
                    vec![json!(1), json!("John Doe"), json!(25)],
                    vec![json!(2), json!("Jane Smith"), json!(30)],
                    vec![json!(3), json!("Bob Johnson"), json!(35)],
                ],
            );
        }

        if normalized.starts_with("DROP TABLE") {
            return QueryResult::success("Table dropped successfully", "1ms");
        }

        QueryResult::failure("Unknown query type", "0ms")
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, query: &str) -> QueryResult {
        Self::classify(query)
    }

    fn tables(&self) -> Vec<TableInfo> {
        vec![
            TableInfo::new("users", 3, 150),
            TableInfo::new("orders", 5, 1200),
            TableInfo::new("products", 4, 45),
        ]
    }

    fn table_schema(&self, name: &str) -> TableSchema {
        TableSchema {
            name: name.to_owned(),
            columns: vec![
                ColumnInfo::new("id", "INTEGER", false),
                ColumnInfo::new("name", "VARCHAR", false),
                ColumnInfo::new("email", "VARCHAR", true),
                ColumnInfo::new("created_at", "TIMESTAMP", false),
            ],
            row_count: 150,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_table_succeeds() {
        let r = MockEngine::new().execute("CREATE TABLE users (id INT)").await;
        assert!(r.success);
        assert_eq!(r.message, "Table created successfully");
        assert_eq!(r.execution_time, "2ms");
        assert!(r.columns.is_none());
    }

    #[tokio::test]
    async fn insert_succeeds() {
        let r = MockEngine::new()
            .execute("INSERT INTO users VALUES (1, 'a', 20)")
            .await;
        assert!(r.success);
        assert_eq!(r.message, "1 row inserted");
        assert_eq!(r.execution_time, "1ms");
    }

    #[tokio::test]
    async fn select_returns_rows() {
        let r = MockEngine::new().execute("SELECT * FROM users").await;
        assert!(r.success);
        assert_eq!(r.execution_time, "3ms");
        assert_eq!(
            r.columns.as_deref(),
            Some(&["id".to_string(), "name".to_string(), "age".to_string()][..])
        );
        let rows = r.rows.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1], "John Doe");
        assert_eq!(rows[2][2], 35);
    }

    #[tokio::test]
    async fn drop_table_succeeds() {
        let r = MockEngine::new().execute("DROP TABLE users").await;
        assert!(r.success);
        assert_eq!(r.message, "Table dropped successfully");
        assert_eq!(r.execution_time, "1ms");
    }

    #[tokio::test]
    async fn unknown_query_fails() {
        let r = MockEngine::new().execute("EXPLAIN SELECT 1").await;
        // EXPLAIN is not one of the recognized prefixes even though it
        // contains SELECT.
        assert!(!r.success);
        assert_eq!(r.message, "Unknown query type");
        assert_eq!(r.execution_time, "0ms");
    }

    #[tokio::test]
    async fn classification_is_case_insensitive() {
        let r = MockEngine::new().execute("select id from users").await;
        assert!(r.success);
        assert!(r.rows.is_some());
    }

    #[tokio::test]
    async fn classification_trims_whitespace() {
        let r = MockEngine::new().execute("   \n\tDROP TABLE t;  ").await;
        assert!(r.success);
        assert_eq!(r.message, "Table dropped successfully");
    }

    #[tokio::test]
    async fn empty_query_is_unknown() {
        let r = MockEngine::new().execute("").await;
        assert!(!r.success);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let engine: std::sync::Arc<dyn QueryEngine> = std::sync::Arc::new(MockEngine::new());
        assert_eq!(engine.name(), "mock");
        let r = engine.execute("SELECT 1").await;
        assert!(r.success);
    }

    #[test]
    fn catalog_lists_three_tables() {
        let tables = MockEngine::new().tables();
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0], TableInfo::new("users", 3, 150));
        assert_eq!(tables[1], TableInfo::new("orders", 5, 1200));
        assert_eq!(tables[2], TableInfo::new("products", 4, 45));
    }

    #[test]
    fn schema_echoes_requested_name() {
        let schema = MockEngine::new().table_schema("orders");
        assert_eq!(schema.name, "orders");
        assert_eq!(schema.row_count, 150);
        assert_eq!(schema.columns.len(), 4);
        assert_eq!(schema.columns[2].name, "email");
        assert!(schema.columns[2].nullable);
    }
}
