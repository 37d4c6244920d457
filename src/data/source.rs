//! Seam between the catalog and the upstream API

use async_trait::async_trait;

use super::{SeasonDetails, ShowDetails, ShowPage, TmdbError, TrendingWindow, TvShow};

/// Upstream provider of show data
///
/// `TmdbClient` is the production implementation; tests substitute fakes.
#[async_trait]
pub trait ShowSource: Send + Sync {
    async fn trending(
        &self,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ShowPage<TvShow>, TmdbError>;

    async fn top_rated(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError>;

    async fn popular(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError>;

    /// Discover shows tagged with `genre_id`, most popular first
    async fn by_genre(&self, genre_id: u32, page: u32) -> Result<ShowPage<TvShow>, TmdbError>;

    /// Blank queries return an empty page without a request
    async fn search(&self, query: &str, page: u32) -> Result<ShowPage<TvShow>, TmdbError>;

    async fn show_details(&self, show_id: u64) -> Result<ShowDetails, TmdbError>;

    async fn season_details(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, TmdbError>;
}
