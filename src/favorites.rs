//! Locally persisted favorites
//!
//! Favorites are a map of show id to `FavoriteShow`, stored as one JSON blob
//! under `favorites:v2` in the durable store:
//!
//! ```text
//! {"data": {"42": {...}}, "savedAt": 1700000000000}
//! ```
//!
//! The blob expires as a whole two hours after its last write. Every mutation
//! rewrites the full blob with a fresh `savedAt` and publishes a change on the
//! `ChangeBus`, which is how other stores (and other running instances, via
//! the storage watcher) learn to reload.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::KeyValueStore;
use crate::clock::Clock;
use crate::data::FavoriteShow;
use crate::events::{ChangeBus, StorageChange};

/// Storage key of the favorites blob
pub const FAVORITES_KEY: &str = "favorites:v2";

/// Age at which the whole blob is discarded
pub fn favorites_expiry() -> Duration {
    Duration::hours(2)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritesBlob {
    data: BTreeMap<u64, FavoriteShow>,
    saved_at: i64,
}

/// Favorites held in memory and mirrored to durable storage
#[derive(Debug)]
pub struct FavoritesStore {
    favorites: BTreeMap<u64, FavoriteShow>,
    store: Arc<dyn KeyValueStore>,
    bus: ChangeBus,
    clock: Arc<dyn Clock>,
}

impl FavoritesStore {
    /// Creates the store and loads whatever unexpired blob is persisted
    pub fn new(store: Arc<dyn KeyValueStore>, bus: ChangeBus, clock: Arc<dyn Clock>) -> Self {
        let mut favorites = Self {
            favorites: BTreeMap::new(),
            store,
            bus,
            clock,
        };
        favorites.reload();
        favorites
    }

    /// Favorites ordered by show id
    pub fn list(&self) -> Vec<FavoriteShow> {
        self.favorites.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn is_favorite(&self, show_id: u64) -> bool {
        self.favorites.contains_key(&show_id)
    }

    pub fn add(&mut self, show: FavoriteShow) {
        self.favorites.insert(show.id, show);
        self.persist();
    }

    pub fn remove(&mut self, show_id: u64) {
        self.favorites.remove(&show_id);
        self.persist();
    }

    /// Adds `show` if absent, removes it if present; returns the new membership
    pub fn toggle(&mut self, show: FavoriteShow) -> bool {
        let now_favorite = if self.favorites.remove(&show.id).is_some() {
            false
        } else {
            self.favorites.insert(show.id, show);
            true
        };
        self.persist();
        now_favorite
    }

    /// Reloads from storage
    ///
    /// An absent or expired blob empties the store; an expired one is also
    /// deleted. An unreadable blob leaves the in-memory state untouched.
    pub fn reload(&mut self) {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.favorites.clear();
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Favorites read skipped");
                return;
            }
        };

        let blob: FavoritesBlob = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable favorites blob");
                return;
            }
        };

        let age = self.clock.now_millis() - blob.saved_at;
        if age >= favorites_expiry().num_milliseconds() {
            tracing::info!(count = blob.data.len(), "Favorites expired");
            self.favorites.clear();
            if let Err(e) = self.store.remove(FAVORITES_KEY) {
                tracing::debug!(error = %e, "Expired favorites not removed");
            }
            return;
        }

        self.favorites = blob.data;
    }

    /// Reloads if `change` concerns the favorites key
    pub fn handle_change(&mut self, change: &StorageChange) {
        if change.key == FAVORITES_KEY {
            self.reload();
        }
    }

    /// Writes the full blob with a fresh timestamp and announces it
    fn persist(&self) {
        let blob = FavoritesBlob {
            data: self.favorites.clone(),
            saved_at: self.clock.now_millis(),
        };
        let json = match serde_json::to_string(&blob) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Favorites not encodable");
                return;
            }
        };
        if let Err(e) = self.store.set(FAVORITES_KEY, &json) {
            tracing::debug!(error = %e, "Favorites write skipped");
            return;
        }
        self.bus.publish(StorageChange::local(FAVORITES_KEY));
    }
}
