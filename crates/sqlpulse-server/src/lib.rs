//! # sqlpulse-server
//!
//! Axum HTTP + `WebSocket` layer for sqlpulse.
//!
//! - REST endpoints: query execution, table catalog, table schema
//! - Broadcast hub: bounded ingestion queue, single dispatch loop, fan-out
//!   to per-subscriber frame queues
//! - `WebSocket` gateway: subscriber registration, heartbeat, guaranteed
//!   deregistration on every exit path
//! - Health check, Prometheus metrics, graceful shutdown via
//!   `tokio::signal` + `CancellationToken`
//!
//! ## Crate Position
//!
//! Sits on top of `sqlpulse-core` (wire types, events) and `sqlpulse-engine`
//! (execution seam). The `sqlpulse` binary wires this crate to a concrete
//! engine and runs it.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod health;
pub mod hub;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod websocket;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::{AppState, PulseServer};
