//! WebSocket subscriber transport.
//!
//! Each connection gets one task that registers with the hub before any
//! traffic flows, pumps broadcast frames from its queue to the socket, and
//! deregisters on every exit path: client disconnect, write failure, or
//! hub-side eviction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use sqlpulse_core::events::PulseEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::hub::SubscriberId;
use crate::metrics::{WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL, WS_SUBSCRIBERS_ACTIVE};
use crate::server::AppState;

/// `GET /ws`: upgrade and hand the connection to its own task.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one subscriber connection from registration to deregistration.
async fn handle_socket(socket: WebSocket, state: AppState) {
    // Register before reading anything: membership means "receives
    // broadcasts", not "has sent a message".
    let (subscriber_id, rx) = state.hub.subscribe();
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_SUBSCRIBERS_ACTIVE).increment(1.0);
    info!(subscriber_id = %subscriber_id, "subscriber connected");

    let connected_at = Instant::now();
    let ping_interval = Duration::from_secs(state.config.ping_interval_secs);
    pump_frames(socket, &subscriber_id, rx, ping_interval).await;

    // Sole deregistration point. `unsubscribe` is a no-op if the hub
    // already evicted this subscriber.
    let _ = state.hub.unsubscribe(&subscriber_id);
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_SUBSCRIBERS_ACTIVE).decrement(1.0);
    info!(
        subscriber_id = %subscriber_id,
        connected_secs = connected_at.elapsed().as_secs(),
        "subscriber disconnected"
    );
}

/// Pump frames until either side of the connection ends.
async fn pump_frames(
    mut socket: WebSocket,
    id: &SubscriberId,
    mut rx: mpsc::Receiver<Arc<String>>,
    ping_interval: Duration,
) {
    // First frame tells the client its assigned ID.
    let hello = PulseEvent::connected(id.as_str());
    match serde_json::to_string(&hello) {
        Ok(json) => {
            if socket.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize hello frame"),
    }

    let (mut sink, mut stream) = socket.split();

    let writer_id = id.clone();
    let mut writer = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(frame) => {
                        if sink.send(Message::Text(frame.as_str().into())).await.is_err() {
                            debug!(subscriber_id = %writer_id, "write failed, closing connection");
                            break;
                        }
                    }
                    // Queue closed: the hub evicted this subscriber.
                    None => break,
                },
                _ = ping.tick() => {
                    if sink.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut reader = tokio::spawn(async move {
        // Subscribers are receive-only; inbound frames are drained purely
        // to notice the disconnect.
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    // Either half ending tears the connection down. Stop the survivor so
    // both socket halves drop and the peer observes the close.
    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }
}
