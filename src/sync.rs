//! Cross-instance storage watcher
//!
//! Two tvdeck windows share one durable store. The watcher polls the watched
//! keys on an interval and publishes an external `StorageChange` whenever the
//! raw stored value differs from what it saw last, so each instance reloads
//! the other's writes. Convergence is eventual and last-write-wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::cache::KeyValueStore;
use crate::events::{ChangeBus, StorageChange};

/// Configuration for the watcher
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval between storage polls
    pub interval: Duration,
    /// Keys whose changes are announced
    pub keys: Vec<String>,
    /// Whether the watcher runs at all
    pub enabled: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            keys: vec![crate::favorites::FAVORITES_KEY.to_string()],
            enabled: true,
        }
    }
}

/// Compares stored values against the last ones seen
#[derive(Debug)]
pub struct ChangeDetector {
    store: Arc<dyn KeyValueStore>,
    seen: HashMap<String, Option<String>>,
}

impl ChangeDetector {
    /// Creates a detector primed with the current stored values
    pub fn new(store: Arc<dyn KeyValueStore>, keys: &[String]) -> Self {
        let mut detector = Self {
            store,
            seen: HashMap::new(),
        };
        for key in keys {
            let current = detector.read(key);
            detector.seen.insert(key.clone(), current);
        }
        detector
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "Watcher read skipped");
                None
            }
        }
    }

    /// Returns the keys whose stored value changed since the last check
    pub fn changed_keys(&mut self) -> Vec<String> {
        let keys: Vec<String> = self.seen.keys().cloned().collect();
        let mut changed = Vec::new();
        for key in keys {
            let current = self.read(&key);
            if self.seen.get(&key) != Some(&current) {
                self.seen.insert(key.clone(), current);
                changed.push(key);
            }
        }
        changed
    }
}

/// Handle for the background watcher task
pub struct StorageWatcher {
    shutdown_tx: mpsc::Sender<()>,
}

impl StorageWatcher {
    /// Spawns the watcher; returns a handle that stops it
    pub fn spawn(config: SyncConfig, store: Arc<dyn KeyValueStore>, bus: ChangeBus) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let mut detector = ChangeDetector::new(store, &config.keys);

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            for key in detector.changed_keys() {
                                tracing::debug!(%key, "Stored value changed externally");
                                bus.publish(StorageChange::external(key));
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self { shutdown_tx }
    }

    /// Stops the background task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
