//! Two-tier TTL cache
//!
//! Reads consult an in-process map first and fall back to the persisted
//! stores. Writes go to the map and to one persisted tier chosen by the
//! caller. Entries carry an absolute expiry and are dropped lazily when a read
//! finds them expired.

use chrono::Duration;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::store::KeyValueStore;
use crate::clock::Clock;

/// Persisted tier a cache write lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    /// Lives as long as the running process
    #[default]
    Session,
    /// Survives restarts
    Durable,
}

/// Stored form of a cache entry: `{"value": ..., "expiresAt": <epoch ms>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    value: T,
    expires_at: i64,
}

impl<T> CacheEntry<T> {
    fn is_live(&self, now_millis: i64) -> bool {
        self.expires_at > now_millis
    }
}

/// Cache shared by every catalog call
///
/// All storage errors are swallowed: a failing read is a miss and a failing
/// write only skips that tier.
#[derive(Debug)]
pub struct TieredCache {
    memory: Mutex<HashMap<String, CacheEntry<Value>>>,
    session: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TieredCache {
    /// Creates a cache over the given session and durable stores
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            session,
            durable,
            clock,
        }
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<Value>>> {
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reads a live value for `key`
    ///
    /// Expired entries found along the way are deleted from whichever
    /// store holds them. A hit in a persisted store repopulates the
    /// in-process map.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();

        {
            let mut memory = self.memory();
            match memory.get(key) {
                Some(entry) if entry.is_live(now) => {
                    return serde_json::from_value(entry.value.clone()).ok();
                }
                Some(_) => {
                    memory.remove(key);
                }
                None => {}
            }
        }

        let raw = self.read_raw(key)?;
        let entry: CacheEntry<Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key, error = %e, "Ignoring unreadable cache entry");
                return None;
            }
        };

        if !entry.is_live(now) {
            tracing::trace!(key, "Cache entry expired");
            self.remove_persisted(key);
            return None;
        }

        let value = serde_json::from_value(entry.value.clone()).ok()?;
        self.memory().insert(key.to_string(), entry);
        Some(value)
    }

    /// Stores `value` under `key` for `ttl`
    ///
    /// The in-process map is always written; the persisted write goes to
    /// `tier` and is best-effort.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration, tier: Tier) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Value is not serializable, skipping cache");
                return;
            }
        };
        let entry = CacheEntry {
            value,
            expires_at: self.clock.now_millis() + ttl.num_milliseconds(),
        };

        let store = match tier {
            Tier::Session => &self.session,
            Tier::Durable => &self.durable,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(e) = store.set(key, &json) {
                    tracing::debug!(key, ?tier, error = %e, "Cache write skipped");
                }
            }
            Err(e) => tracing::debug!(key, error = %e, "Cache entry not encodable"),
        }

        self.memory().insert(key.to_string(), entry);
    }

    /// Removes `key` from every tier
    pub fn delete(&self, key: &str) {
        self.memory().remove(key);
        self.remove_persisted(key);
    }

    /// Empties the in-process map, leaving persisted entries alone
    pub fn clear_memory(&self) {
        self.memory().clear();
    }

    /// Reads the session tier first, then the durable tier
    fn read_raw(&self, key: &str) -> Option<String> {
        for store in [&self.session, &self.durable] {
            match store.get(key) {
                Ok(Some(raw)) => return Some(raw),
                Ok(None) => {}
                Err(e) => tracing::debug!(key, error = %e, "Cache read skipped"),
            }
        }
        None
    }

    fn remove_persisted(&self, key: &str) {
        for store in [&self.session, &self.durable] {
            if let Err(e) = store.remove(key) {
                tracing::debug!(key, error = %e, "Cache removal skipped");
            }
        }
    }
}
