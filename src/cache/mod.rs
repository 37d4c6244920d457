//! Caching and persistence layer
//!
//! `TieredCache` keeps API responses in an in-process map backed by one of two
//! persisted tiers: a session store that lives as long as the process and a
//! durable file store in the XDG cache directory. The same stores hold the
//! favorites blob.

mod manager;
mod store;

pub use manager::{TieredCache, Tier};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
