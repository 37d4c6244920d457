//! Cached access to the show source
//!
//! Every catalog read checks `TieredCache` before asking the upstream source
//! and caches successful responses under `tmdb:<namespace>:<params>`. Genre
//! discovery is the exception: it always goes upstream and stores nothing.

use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::cache::{TieredCache, Tier};
use crate::data::{
    SeasonDetails, ShowDetails, ShowPage, ShowSource, TmdbError, TrendingWindow, TvShow,
};

/// TTL for trending lists (session tier)
const TRENDING_TTL_MINUTES: i64 = 10;

/// TTL for top rated and popular lists (durable tier)
const LIST_TTL_MINUTES: i64 = 30;

/// TTL for search results (session tier)
const SEARCH_TTL_MINUTES: i64 = 5;

/// TTL for show and season details (durable tier)
const DETAILS_TTL_MINUTES: i64 = 60;

/// Read-through cache in front of a `ShowSource`
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn ShowSource>,
    cache: Arc<TieredCache>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").field("cache", &self.cache).finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(source: Arc<dyn ShowSource>, cache: Arc<TieredCache>) -> Self {
        Self { source, cache }
    }

    pub async fn trending(
        &self,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ShowPage<TvShow>, TmdbError> {
        let key = format!("tmdb:trending:{}:{}", window.as_str(), page);
        self.cached(&key, TRENDING_TTL_MINUTES, Tier::Session, || {
            self.source.trending(window, page)
        })
        .await
    }

    pub async fn top_rated(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        let key = format!("tmdb:top_rated:{}", page);
        self.cached(&key, LIST_TTL_MINUTES, Tier::Durable, || {
            self.source.top_rated(page)
        })
        .await
    }

    pub async fn popular(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        let key = format!("tmdb:popular:{}", page);
        self.cached(&key, LIST_TTL_MINUTES, Tier::Durable, || {
            self.source.popular(page)
        })
        .await
    }

    /// Shows for one genre, always fetched upstream
    pub async fn shows_by_genre(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<ShowPage<TvShow>, TmdbError> {
        self.source.by_genre(genre_id, page).await
    }

    /// Searches by name; blank queries return an empty page
    pub async fn search(&self, query: &str, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ShowPage::empty());
        }
        let key = format!("tmdb:search:{}:{}", query.to_lowercase(), page);
        self.cached(&key, SEARCH_TTL_MINUTES, Tier::Session, || {
            self.source.search(query, page)
        })
        .await
    }

    pub async fn show_details(&self, show_id: u64) -> Result<ShowDetails, TmdbError> {
        let key = format!("tmdb:show:{}", show_id);
        self.cached(&key, DETAILS_TTL_MINUTES, Tier::Durable, || {
            self.source.show_details(show_id)
        })
        .await
    }

    pub async fn season_details(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, TmdbError> {
        let key = format!("tmdb:season:{}:{}", show_id, season_number);
        self.cached(&key, DETAILS_TTL_MINUTES, Tier::Durable, || {
            self.source.season_details(show_id, season_number)
        })
        .await
    }

    /// Returns the cached value for `key` or runs `fetch` and caches its success
    async fn cached<T, F, Fut>(
        &self,
        key: &str,
        ttl_minutes: i64,
        tier: Tier,
        fetch: F,
    ) -> Result<T, TmdbError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, TmdbError>>,
    {
        if let Some(hit) = self.cache.get::<T>(key) {
            tracing::debug!(key, "Catalog cache hit");
            return Ok(hit);
        }

        let value = fetch().await?;
        self.cache.set(key, &value, Duration::minutes(ttl_minutes), tier);
        Ok(value)
    }
}
