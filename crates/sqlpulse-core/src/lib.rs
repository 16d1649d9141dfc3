//! # sqlpulse-core
//!
//! Foundation types for the sqlpulse web console.
//!
//! This crate provides the shared vocabulary the server and engine crates
//! depend on:
//!
//! - **Events**: [`events::PulseEvent`] broadcast to WebSocket subscribers
//! - **Query types**: [`query::QueryRequest`] and [`query::QueryResult`]
//! - **Catalog types**: [`tables::TableInfo`] and [`tables::TableSchema`]
//! - **Logging**: [`logging::init_subscriber`] for tracing setup
//!
//! All wire types serialize with snake_case field names; the JSON shapes are
//! consumed by the bundled browser console and must stay stable.
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other sqlpulse crates.

#![deny(unsafe_code)]

pub mod events;
pub mod logging;
pub mod query;
pub mod tables;
