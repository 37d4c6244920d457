//! Storage change notifications
//!
//! A single publish/subscribe contract replaces the two browser events the
//! favorites store used to listen for (an in-page custom event and the native
//! cross-document storage event). Writers in this process and the storage
//! watcher both publish here; subscribers drain on their own loop turn, so a
//! publish never re-enters a subscriber.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Default number of undelivered notifications kept per subscriber
const DEFAULT_CAPACITY: usize = 64;

/// Where a change was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Written by this process
    Local,
    /// Noticed in the durable store, written by another running instance
    External,
}

/// Notification that a persisted key changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub origin: ChangeOrigin,
}

impl StorageChange {
    pub fn local(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            origin: ChangeOrigin::Local,
        }
    }

    pub fn external(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            origin: ChangeOrigin::External,
        }
    }
}

/// Broadcast bus for `StorageChange` notifications
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<StorageChange>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes a change; having no subscribers is fine
    pub fn publish(&self, change: StorageChange) {
        tracing::trace!(key = %change.key, origin = ?change.origin, "Publishing storage change");
        let _ = self.tx.send(change);
    }

    /// Subscribes to changes published from now on
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving end of a `ChangeBus`
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<StorageChange>,
}

impl Subscription {
    /// Returns the next pending change without waiting
    ///
    /// Notifications lost to lagging are skipped; since every consumer
    /// reloads the full state, the next delivered one is enough to converge.
    pub fn try_next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => return Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next change, `None` once every publisher is gone
    pub async fn next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = ChangeBus::new();
        bus.publish(StorageChange::local("favorites:v2"));
    }

    #[test]
    fn test_every_subscriber_sees_each_change() {
        let bus = ChangeBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(StorageChange::local("favorites:v2"));

        assert_eq!(first.try_next(), Some(StorageChange::local("favorites:v2")));
        assert_eq!(second.try_next(), Some(StorageChange::local("favorites:v2")));
        assert_eq!(first.try_next(), None);
    }

    #[test]
    fn test_subscription_only_sees_later_changes() {
        let bus = ChangeBus::new();
        bus.publish(StorageChange::local("before"));

        let mut sub = bus.subscribe();
        bus.publish(StorageChange::external("after"));

        assert_eq!(sub.try_next(), Some(StorageChange::external("after")));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_lagging_subscriber_recovers() {
        let bus = ChangeBus::with_capacity(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.publish(StorageChange::local(format!("k{}", i)));
        }

        let received = sub.try_next().expect("a change should survive lagging");
        assert_eq!(received.key, "k3");
    }

    #[tokio::test]
    async fn test_next_waits_for_publish() {
        let bus = ChangeBus::new();
        let mut sub = bus.subscribe();
        let publisher = bus.clone();

        tokio::spawn(async move {
            publisher.publish(StorageChange::external("favorites:v2"));
        });

        let change = sub.next().await.expect("change should arrive");
        assert_eq!(change.origin, ChangeOrigin::External);
    }
}
