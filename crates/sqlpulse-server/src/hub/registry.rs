//! Subscriber registry: the live set of broadcast recipients.
//!
//! The registry owns only routing state (each subscriber's frame-queue
//! sender). The underlying socket belongs to the connection task in
//! [`crate::websocket`]; dropping a subscriber here closes its queue, which
//! that task observes as end-of-stream.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Unique identifier for one subscriber connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Generate a fresh ID (`sub_{uuid}`; v7 keeps them time-sortable).
    fn generate() -> Self {
        Self(format!("sub_{}", Uuid::now_v7()))
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one non-blocking delivery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Frame queued for the subscriber's writer.
    Sent,
    /// Frame queue full; the frame was dropped for this subscriber.
    Dropped,
    /// Frame queue closed; the subscriber is gone and should be removed.
    Closed,
}

/// One registered subscriber: the send half of its outbound frame queue
/// plus a lifetime drop counter.
pub struct Subscriber {
    /// Registry key, also reported to the client in the hello frame.
    pub id: SubscriberId,
    tx: mpsc::Sender<Arc<String>>,
    connected_at: Instant,
    dropped_frames: AtomicU64,
}

impl Subscriber {
    fn new(id: SubscriberId, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            tx,
            connected_at: Instant::now(),
            dropped_frames: AtomicU64::new(0),
        }
    }

    /// Queue a frame without blocking.
    pub fn send(&self, frame: Arc<String>) -> SendOutcome {
        match self.tx.try_send(frame) {
            Ok(()) => SendOutcome::Sent,
            Err(TrySendError::Full(_)) => {
                let _ = self.dropped_frames.fetch_add(1, Ordering::Relaxed);
                SendOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => SendOutcome::Closed,
        }
    }

    /// Total frames dropped on this subscriber's full queue.
    pub fn drop_count(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Time since this subscriber registered.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

/// Live set of subscribers, synchronized for concurrent add, remove, and
/// iterate-and-deliver.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, Arc<Subscriber>>>,
    // Mirrors the map size so `len` never takes the lock.
    active_count: AtomicUsize,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
        }
    }

    /// Create a subscriber with a fresh ID and a frame queue of the given
    /// capacity (must be non-zero), and add it to the live set.
    ///
    /// Returns the subscriber handle and the receive half of its queue; the
    /// caller owns the receiver and pumps it to the socket.
    pub fn register(&self, queue_capacity: usize) -> (Arc<Subscriber>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(queue_capacity);
        let subscriber = Arc::new(Subscriber::new(SubscriberId::generate(), tx));

        let mut subscribers = self.subscribers.write();
        if subscribers
            .insert(subscriber.id.clone(), Arc::clone(&subscriber))
            .is_none()
        {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        }

        (subscriber, rx)
    }

    /// Remove a subscriber by ID. Returns `false` (and does nothing) if the
    /// ID is not registered, so removing twice is safe.
    pub fn remove(&self, id: &SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        if subscribers.remove(id).is_some() {
            let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Clone out the current subscriber set for one dispatch round.
    pub fn snapshot(&self) -> Vec<Arc<Subscriber>> {
        self.subscribers.read().values().cloned().collect()
    }

    /// Whether the given ID is currently registered.
    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.read().contains_key(id)
    }

    /// Current subscriber count.
    pub fn len(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Whether no subscribers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────── Tests ───────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    #[test]
    fn starts_empty() {
        let registry = SubscriberRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn register_adds_subscriber() {
        let registry = SubscriberRegistry::new();
        let (subscriber, _rx) = registry.register(8);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&subscriber.id));
    }

    #[test]
    fn ids_are_unique_and_prefixed() {
        let registry = SubscriberRegistry::new();
        let mut ids = HashSet::new();
        let mut receivers = Vec::new();
        for _ in 0..50 {
            let (subscriber, rx) = registry.register(1);
            assert!(subscriber.id.as_str().starts_with("sub_"));
            assert!(ids.insert(subscriber.id.clone()));
            receivers.push(rx);
        }
        assert_eq!(registry.len(), 50);
    }

    #[test]
    fn remove_returns_true_then_false() {
        let registry = SubscriberRegistry::new();
        let (subscriber, _rx) = registry.register(8);
        assert!(registry.remove(&subscriber.id));
        assert!(!registry.remove(&subscriber.id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let registry = SubscriberRegistry::new();
        let (first, _rx) = registry.register(8);
        assert!(!registry.remove(&SubscriberId::generate()));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&first.id));
    }

    #[test]
    fn snapshot_reflects_membership() {
        let registry = SubscriberRegistry::new();
        let (a, _rx_a) = registry.register(8);
        let (_b, _rx_b) = registry.register(8);
        let (_c, _rx_c) = registry.register(8);
        assert_eq!(registry.snapshot().len(), 3);

        let _ = registry.remove(&a.id);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|s| s.id != a.id));
    }

    #[tokio::test]
    async fn send_delivers_shared_frame() {
        let registry = SubscriberRegistry::new();
        let (subscriber, mut rx) = registry.register(8);

        let frame = Arc::new(String::from("{\"type\":\"x\"}"));
        assert_matches!(subscriber.send(Arc::clone(&frame)), SendOutcome::Sent);

        let received = rx.recv().await.unwrap();
        assert!(Arc::ptr_eq(&frame, &received));
    }

    #[test]
    fn send_drops_when_queue_full() {
        let registry = SubscriberRegistry::new();
        let (subscriber, _rx) = registry.register(1);

        let frame = Arc::new(String::from("payload"));
        assert_matches!(subscriber.send(Arc::clone(&frame)), SendOutcome::Sent);
        assert_matches!(subscriber.send(Arc::clone(&frame)), SendOutcome::Dropped);
        assert_matches!(subscriber.send(frame), SendOutcome::Dropped);
        assert_eq!(subscriber.drop_count(), 2);
    }

    #[test]
    fn age_increases() {
        let registry = SubscriberRegistry::new();
        let (subscriber, _rx) = registry.register(8);
        let first = subscriber.age();
        std::thread::sleep(Duration::from_millis(10));
        assert!(subscriber.age() > first);
    }

    #[test]
    fn send_reports_closed_after_receiver_dropped() {
        let registry = SubscriberRegistry::new();
        let (subscriber, rx) = registry.register(8);
        drop(rx);

        let frame = Arc::new(String::from("payload"));
        assert_matches!(subscriber.send(frame), SendOutcome::Closed);
        // Closed is not a drop.
        assert_eq!(subscriber.drop_count(), 0);
    }

    #[test]
    fn removing_registry_entry_closes_the_queue() {
        let registry = SubscriberRegistry::new();
        let (subscriber, mut rx) = registry.register(8);
        let id = subscriber.id.clone();
        drop(subscriber);

        assert!(registry.remove(&id));
        // The registry held the last sender, so the queue ends.
        assert_matches!(rx.try_recv(), Err(mpsc::error::TryRecvError::Disconnected));
    }
}
