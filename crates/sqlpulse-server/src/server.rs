//! `PulseServer`: HTTP + WebSocket server assembly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlpulse_engine::QueryEngine;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::hub::Hub;
use crate::routes;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast hub publish handle.
    pub hub: Hub,
    /// Query execution backend.
    pub engine: Arc<dyn QueryEngine>,
    /// Prometheus render handle for `/metrics`.
    pub metrics: PrometheusHandle,
    /// When the server started.
    pub start_time: Instant,
    /// Server configuration.
    pub config: ServerConfig,
}

/// The assembled sqlpulse server.
pub struct PulseServer {
    state: AppState,
    cancel: CancellationToken,
}

impl PulseServer {
    /// Assemble a server from its parts.
    ///
    /// The hub's dispatcher is expected to be spawned by the caller; the
    /// server only publishes into the hub and reads its counters.
    pub fn new(
        config: ServerConfig,
        engine: Arc<dyn QueryEngine>,
        hub: Hub,
        metrics: PrometheusHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state: AppState {
                hub,
                engine,
                metrics,
                start_time: Instant::now(),
                config,
            },
            cancel,
        }
    }

    /// Build the router over this server's state.
    pub fn router(&self) -> Router {
        routes::build_router(self.state.clone())
    }

    /// Bind the configured address and start serving.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task,
    /// which runs until the cancellation token fires.
    pub async fn listen(&self) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, engine = self.state.engine.name(), "listening");

        let router = self.router();
        let cancel = self.cancel.clone();
        let task = tokio::spawn(async move {
            let shutdown = async move { cancel.cancelled().await };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "server error");
            }
        });

        Ok((local_addr, task))
    }

    /// Shared handler state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }
}

// ─────────────────────────── Tests ───────────────────────────
