//! Broadcast hub: bounded ingestion queue feeding a single dispatch loop.
//!
//! Publishers serialize an event once, hand the shared payload to the
//! ingestion queue without ever blocking, and move on. The hub's one
//! dispatch loop drains that queue and fans each payload out to every
//! registered subscriber's frame queue. A slow subscriber loses frames
//! rather than slowing anyone else down, and is evicted entirely once its
//! lifetime drop count crosses [`MAX_TOTAL_DROPS`].

pub mod registry;

pub use registry::{SendOutcome, Subscriber, SubscriberId, SubscriberRegistry};

use std::sync::Arc;

use metrics::counter;
use sqlpulse_core::events::PulseEvent;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::metrics::{
    HUB_PUBLISHES_TOTAL, HUB_PUBLISH_DROPS_TOTAL, WS_BROADCAST_DROPS_TOTAL, WS_EVICTIONS_TOTAL,
};

/// Maximum total lifetime frame drops before a slow subscriber is evicted.
const MAX_TOTAL_DROPS: u64 = 100;

/// Publish side of the broadcast hub. Cheap to clone; every clone feeds the
/// same dispatch loop.
#[derive(Clone)]
pub struct Hub {
    registry: Arc<SubscriberRegistry>,
    tx: mpsc::Sender<Arc<String>>,
    subscriber_queue_capacity: usize,
    cancel: CancellationToken,
}

impl Hub {
    /// Create a hub and its dispatcher.
    ///
    /// The caller spawns [`Dispatcher::run`] exactly once; everything else
    /// holds `Hub` clones. Queue capacities must be non-zero.
    pub fn new(
        hub_queue_capacity: usize,
        subscriber_queue_capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, Dispatcher) {
        let registry = Arc::new(SubscriberRegistry::new());
        let (tx, rx) = mpsc::channel(hub_queue_capacity);

        let hub = Self {
            registry: Arc::clone(&registry),
            tx,
            subscriber_queue_capacity,
            cancel: cancel.clone(),
        };
        let dispatcher = Dispatcher {
            rx,
            registry,
            cancel,
        };
        (hub, dispatcher)
    }

    /// Serialize an event once and queue it for dispatch.
    ///
    /// Never blocks: if the ingestion queue is full (or the dispatch loop
    /// has stopped) the event is dropped and `false` is returned. The
    /// return value is advisory; publishers are not expected to retry.
    pub fn publish(&self, event: &PulseEvent) -> bool {
        let payload = match serde_json::to_string(event) {
            Ok(json) => Arc::new(json),
            Err(e) => {
                warn!(error = %e, "failed to serialize event, not publishing");
                return false;
            }
        };

        match self.tx.try_send(payload) {
            Ok(()) => {
                counter!(HUB_PUBLISHES_TOTAL).increment(1);
                true
            }
            Err(TrySendError::Full(_)) => {
                counter!(HUB_PUBLISH_DROPS_TOTAL).increment(1);
                debug!("ingestion queue full, event dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("dispatch loop stopped, event dropped");
                false
            }
        }
    }

    /// Register a new subscriber.
    ///
    /// Returns its ID and the receive half of its frame queue. The registry
    /// keeps the only owning handle to the send half, so removal (explicit
    /// or by eviction) closes the queue and the connection task sees
    /// end-of-stream.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::Receiver<Arc<String>>) {
        let (subscriber, rx) = self.registry.register(self.subscriber_queue_capacity);
        (subscriber.id.clone(), rx)
    }

    /// Remove a subscriber. Safe to call after the hub already evicted it.
    pub fn unsubscribe(&self, id: &SubscriberId) -> bool {
        self.registry.remove(id)
    }

    /// Current subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Stop the dispatch loop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// The hub's single consumer: drains the ingestion queue and fans each
/// payload out. [`Dispatcher::run`] consumes the dispatcher, so a hub can
/// never have two dispatch loops.
pub struct Dispatcher {
    rx: mpsc::Receiver<Arc<String>>,
    registry: Arc<SubscriberRegistry>,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Run until the cancellation token fires or every publish handle has
    /// been dropped.
    pub async fn run(mut self) {
        let cancel = self.cancel.clone();
        info!("dispatch loop started");
        loop {
            let next = tokio::select! {
                () = cancel.cancelled() => {
                    info!("dispatch loop stopping on shutdown signal");
                    break;
                }
                next = self.rx.recv() => next,
            };
            match next {
                Some(payload) => self.dispatch_round(&payload),
                None => {
                    info!("all publish handles dropped, dispatch loop stopping");
                    break;
                }
            }
        }
    }

    /// Deliver one payload to every registered subscriber.
    ///
    /// A full frame queue costs that subscriber the frame (and, past the
    /// drop threshold, its registration); a closed queue gets the
    /// subscriber removed immediately. Either way the rest of the round
    /// continues untouched.
    fn dispatch_round(&self, payload: &Arc<String>) {
        let subscribers = self.registry.snapshot();
        let mut recipients = 0usize;
        let mut to_remove = Vec::new();

        for subscriber in &subscribers {
            match subscriber.send(Arc::clone(payload)) {
                SendOutcome::Sent => recipients += 1,
                SendOutcome::Closed => {
                    debug!(subscriber_id = %subscriber.id, "subscriber queue closed, removing");
                    to_remove.push(subscriber.id.clone());
                }
                SendOutcome::Dropped => {
                    counter!(WS_BROADCAST_DROPS_TOTAL).increment(1);
                    let drops = subscriber.drop_count();
                    if drops >= MAX_TOTAL_DROPS {
                        counter!(WS_EVICTIONS_TOTAL).increment(1);
                        warn!(
                            subscriber_id = %subscriber.id,
                            drops,
                            connected_secs = subscriber.age().as_secs(),
                            "evicting slow subscriber"
                        );
                        to_remove.push(subscriber.id.clone());
                    } else {
                        warn!(
                            subscriber_id = %subscriber.id,
                            drops,
                            "subscriber queue full, frame dropped"
                        );
                    }
                }
            }
        }

        for id in &to_remove {
            let _ = self.registry.remove(id);
        }

        debug!(recipients, total = subscribers.len(), "dispatched event");
    }
}

// ─────────────────────────── Tests ───────────────────────────
