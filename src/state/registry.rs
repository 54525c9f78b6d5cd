//! Registry - handles in use and the channel's subscribers.
//!
//! Everything sits behind one `parking_lot::Mutex`. No operation awaits or
//! does I/O while holding it; [`Registry::broadcast`] copies the subscriber
//! list out and delivers after the lock is released.

use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::{ConnId, Outbox};

#[derive(Debug, Default)]
struct Inner {
    handles: HashSet<String>,
    subscribers: Vec<Outbox>,
}

/// Process-wide shared state for the relay.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `handle`. Returns `false`, changing nothing, if it is held.
    pub fn reserve(&self, handle: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.handles.contains(handle) {
            return false;
        }
        inner.handles.insert(handle.to_string())
    }

    /// Give `handle` back. Releasing a free handle is a no-op.
    pub fn release(&self, handle: &str) {
        self.inner.lock().handles.remove(handle);
    }

    /// Whether `handle` is currently held.
    pub fn is_reserved(&self, handle: &str) -> bool {
        self.inner.lock().handles.contains(handle)
    }

    /// Number of handles currently held.
    pub fn handle_count(&self) -> usize {
        self.inner.lock().handles.len()
    }

    /// Add `outbox` to the channel. Returns `false` if it was already there.
    pub fn subscribe(&self, outbox: &Outbox) -> bool {
        let mut inner = self.inner.lock();
        if inner.subscribers.iter().any(|s| s.id() == outbox.id()) {
            return false;
        }
        inner.subscribers.push(outbox.clone());
        true
    }

    /// Remove connection `id` from the channel. Returns `false` if it was
    /// not subscribed.
    pub fn unsubscribe(&self, id: ConnId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.id() != id);
        inner.subscribers.len() != before
    }

    /// Whether connection `id` is subscribed.
    pub fn is_subscribed(&self, id: ConnId) -> bool {
        self.inner.lock().subscribers.iter().any(|s| s.id() == id)
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Deliver `text` to everyone subscribed at the moment of the call.
    ///
    /// A recipient that cannot take the frame is unsubscribed and told to
    /// disconnect; delivery to the rest carries on. Returns the number of
    /// successful deliveries.
    pub fn broadcast(&self, text: &str) -> usize {
        let snapshot = self.inner.lock().subscribers.clone();

        let mut delivered = 0;
        for outbox in &snapshot {
            match outbox.receives(text) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(conn = %outbox.id(), error = %e, "Dropping subscriber");
                    self.unsubscribe(outbox.id());
                    outbox.disconnect();
                }
            }
        }

        debug!(delivered, recipients = snapshot.len(), "Broadcast");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnIdGenerator;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    fn subscriber(ids: &ConnIdGenerator, capacity: usize) -> (Outbox, mpsc::Receiver<String>) {
        Outbox::new(ids.next(), capacity, CancellationToken::new())
    }

    #[test]
    fn test_reserve_is_exclusive() {
        let registry = Registry::new();
        assert!(registry.reserve("alice"));
        assert!(!registry.reserve("alice"));
        assert!(registry.reserve("Alice"));
        assert_eq!(registry.handle_count(), 2);
    }

    #[test]
    fn test_release_makes_handle_reservable() {
        let registry = Registry::new();
        assert!(registry.reserve("alice"));
        registry.release("alice");
        registry.release("alice");
        assert!(!registry.is_reserved("alice"));
        assert!(registry.reserve("alice"));
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let ids = ConnIdGenerator::new();
        let registry = Registry::new();
        let (outbox, _rx) = subscriber(&ids, 4);

        assert!(registry.subscribe(&outbox));
        assert!(!registry.subscribe(&outbox));
        assert_eq!(registry.subscriber_count(), 1);

        assert!(registry.unsubscribe(outbox.id()));
        assert!(!registry.unsubscribe(outbox.id()));
        assert!(!registry.is_subscribed(outbox.id()));
    }

    #[test]
    fn test_concurrent_reserve_has_one_winner() {
        let registry = Arc::new(Registry::new());
        let winners: usize = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.reserve("alice"))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();

        assert_eq!(winners, 1);
        assert_eq!(registry.handle_count(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_subscriber() {
        let ids = ConnIdGenerator::new();
        let registry = Registry::new();
        let mut receivers = Vec::new();
        for _ in 0..5 {
            let (outbox, rx) = subscriber(&ids, 4);
            registry.subscribe(&outbox);
            receivers.push(rx);
        }

        assert_eq!(registry.broadcast(":alice PRIVMSG #global :hi"), 5);
        for rx in &mut receivers {
            assert_eq!(rx.recv().await.as_deref(), Some(":alice PRIVMSG #global :hi"));
        }
    }

    #[tokio::test]
    async fn test_dead_subscriber_is_isolated() {
        let ids = ConnIdGenerator::new();
        let registry = Registry::new();

        let (first, mut first_rx) = subscriber(&ids, 4);
        let (dead, dead_rx) = subscriber(&ids, 4);
        let (last, mut last_rx) = subscriber(&ids, 4);
        for outbox in [&first, &dead, &last] {
            registry.subscribe(outbox);
        }
        drop(dead_rx);

        assert_eq!(registry.broadcast("hello"), 2);
        assert!(!registry.is_subscribed(dead.id()));
        assert!(dead.is_disconnected());
        assert!(!first.is_disconnected());
        assert_eq!(registry.subscriber_count(), 2);
        assert_eq!(first_rx.recv().await.as_deref(), Some("hello"));
        assert_eq!(last_rx.recv().await.as_deref(), Some("hello"));
    }

    #[test]
    fn test_full_queue_drops_only_slow_subscriber() {
        let ids = ConnIdGenerator::new();
        let registry = Registry::new();
        let (slow, _slow_rx) = subscriber(&ids, 1);
        let (fast, _fast_rx) = subscriber(&ids, 8);
        registry.subscribe(&slow);
        registry.subscribe(&fast);

        assert_eq!(registry.broadcast("one"), 2);
        assert_eq!(registry.broadcast("two"), 1);
        assert!(slow.is_disconnected());
        assert!(!registry.is_subscribed(slow.id()));
        assert!(registry.is_subscribed(fast.id()));
    }
}
