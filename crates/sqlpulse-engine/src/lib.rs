//! # sqlpulse-engine
//!
//! The query-execution seam for the sqlpulse server.
//!
//! [`QueryEngine`] is the trait the HTTP layer calls into; the server never
//! parses or interprets query text itself. The only shipped implementation is
//! [`MockEngine`], which classifies queries by prefix and answers with canned
//! results and a fixed demo catalog. A real database backend would implement
//! the same trait.

#![deny(unsafe_code)]

pub mod mock;

pub use mock::MockEngine;

use async_trait::async_trait;
use sqlpulse_core::query::QueryResult;
use sqlpulse_core::tables::{TableInfo, TableSchema};

/// A query execution backend.
///
/// Implementations must be cheap to share (`Arc<dyn QueryEngine>`) and safe
/// to call concurrently from many request handlers.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Short backend name for logs, e.g. `"mock"`.
    fn name(&self) -> &str;

    /// Execute a raw query string.
    ///
    /// Never fails at the transport level: engine-side problems are reported
    /// inside the returned [`QueryResult`] with `success: false`.
    async fn execute(&self, query: &str) -> QueryResult;

    /// List the table catalog.
    fn tables(&self) -> Vec<TableInfo>;

    /// Column-level schema for a named table.
    fn table_schema(&self, name: &str) -> TableSchema;
}
