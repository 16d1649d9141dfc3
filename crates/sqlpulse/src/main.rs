//! # sqlpulse
//!
//! Server binary: wires the mock engine, the broadcast hub, and the HTTP +
//! WebSocket layer together and runs until ctrl-c.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use sqlpulse_engine::MockEngine;
use sqlpulse_server::config::ServerConfig;
use sqlpulse_server::hub::Hub;
use sqlpulse_server::server::PulseServer;
use sqlpulse_server::shutdown::ShutdownCoordinator;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Live SQL query console server.
#[derive(Parser, Debug)]
#[command(name = "sqlpulse", about = "Live SQL query console server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Capacity of the hub ingestion queue.
    #[arg(long, default_value = "256")]
    hub_queue_capacity: usize,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn config_from_args(args: &Cli) -> ServerConfig {
    ServerConfig {
        host: args.host.clone(),
        port: args.port,
        hub_queue_capacity: args.hub_queue_capacity,
        ..ServerConfig::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    sqlpulse_core::logging::init_subscriber(&args.log_level);

    let metrics_handle = sqlpulse_server::metrics::install_recorder();
    let config = config_from_args(&args);

    let shutdown = ShutdownCoordinator::new();
    let (hub, dispatcher) = Hub::new(
        config.hub_queue_capacity,
        config.subscriber_queue_capacity,
        shutdown.token().child_token(),
    );
    let dispatch_task = tokio::spawn(dispatcher.run());

    let engine = Arc::new(MockEngine::default());
    let server = PulseServer::new(config, engine, hub, metrics_handle, shutdown.token());

    let (addr, serve_task) = server.listen().await.context("failed to bind server")?;
    tracing::info!("sqlpulse listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    shutdown
        .graceful_shutdown(vec![serve_task, dispatch_task], None)
        .await;
    tracing::info!("shutdown complete");
    Ok(())
}
