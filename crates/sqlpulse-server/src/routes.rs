//! Route handlers and router assembly.
//!
//! | Route              | Method | Handler          |
//! |--------------------|--------|------------------|
//! | `/`                | GET    | `console_page`   |
//! | `/api/query`       | POST   | `execute_query`  |
//! | `/api/tables`      | GET    | `list_tables`    |
//! | `/api/table/{name}`| GET    | `table_schema`   |
//! | `/ws`              | GET    | WebSocket upgrade|
//! | `/health`          | GET    | `health_handler` |
//! | `/metrics`         | GET    | `metrics_handler`|

use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use metrics::counter;
use sqlpulse_core::events::PulseEvent;
use sqlpulse_core::query::{QueryRequest, QueryResult};
use sqlpulse_core::tables::{TableInfo, TableSchema};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health::{self, HealthResponse};
use crate::metrics::QUERIES_EXECUTED_TOTAL;
use crate::server::AppState;
use crate::websocket;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(console_page))
        .route("/api/query", post(execute_query))
        .route("/api/tables", get(list_tables))
        .route("/api/table/{name}", get(table_schema))
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /`: the self-contained demo console.
async fn console_page() -> Html<&'static str> {
    Html(include_str!("console.html"))
}

/// `POST /api/query`: run a query and notify subscribers.
async fn execute_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResult> {
    let result = state.engine.execute(&request.query).await;
    let outcome = if result.success { "success" } else { "failure" };
    counter!(QUERIES_EXECUTED_TOTAL, "outcome" => outcome).increment(1);
    info!(engine = state.engine.name(), success = result.success, "query executed");

    // Fire-and-forget: a full hub queue costs us the notification, never
    // the response.
    let _ = state
        .hub
        .publish(&PulseEvent::query_executed(request.query.as_str(), result.success));

    Json(result)
}

/// `GET /api/tables`: the table catalog as a bare array.
async fn list_tables(State(state): State<AppState>) -> Json<Vec<TableInfo>> {
    Json(state.engine.tables())
}

/// `GET /api/table/{name}`: column-level schema for one table.
async fn table_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<TableSchema> {
    Json(state.engine.table_schema(&name))
}

/// `GET /health`
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.hub.subscriber_count(),
    ))
}

/// `GET /metrics`: Prometheus text format.
async fn metrics_handler(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics)
}

// ─────────────────────────── Tests ───────────────────────────
