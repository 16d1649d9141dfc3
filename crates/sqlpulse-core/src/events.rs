//! Broadcast event types.
//!
//! [`PulseEvent`] is the notification payload fanned out to every connected
//! WebSocket subscriber. Events are transient: they are serialized once at
//! publish time and never persisted. The browser console dispatches on the
//! `type` tag and ignores types it does not know, so adding variants is a
//! compatible change.

use serde::{Deserialize, Serialize};

/// A notification broadcast to all live subscribers.
///
/// Serialized with a `type` tag so clients can dispatch without a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PulseEvent {
    /// A query finished executing (successfully or not).
    #[serde(rename = "query_executed")]
    QueryExecuted {
        /// Original query text as submitted.
        query: String,
        /// Wall-clock time of execution, `HH:MM:SS` local.
        timestamp: String,
        /// Whether the engine reported success.
        success: bool,
    },

    /// Sent once to a subscriber immediately after it registers.
    #[serde(rename = "connected")]
    Connected {
        /// Server-assigned subscriber ID.
        subscriber_id: String,
        /// Wall-clock time of registration, `HH:MM:SS` local.
        timestamp: String,
    },
}

impl PulseEvent {
    /// Build a [`PulseEvent::QueryExecuted`] stamped with the current time.
    #[must_use]
    pub fn query_executed(query: impl Into<String>, success: bool) -> Self {
        Self::QueryExecuted {
            query: query.into(),
            timestamp: event_timestamp(),
            success,
        }
    }

    /// Build a [`PulseEvent::Connected`] stamped with the current time.
    #[must_use]
    pub fn connected(subscriber_id: impl Into<String>) -> Self {
        Self::Connected {
            subscriber_id: subscriber_id.into(),
            timestamp: event_timestamp(),
        }
    }
}

/// Current wall-clock time as `HH:MM:SS` in the server's local timezone.
#[must_use]
pub fn event_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
