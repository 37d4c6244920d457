//! TMDB v3 API client
//!
//! Issues authenticated GET requests against a fixed set of endpoints and maps
//! the JSON responses into the records in `data`. Every failure is logged and
//! re-raised as a `TmdbError` tagged with the operation that failed.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::source::ShowSource;
use super::{SeasonDetails, ShowDetails, ShowPage, TrendingWindow, TvShow};

/// Default base URL for the TMDB API
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Language sent with every request
const LANGUAGE: &str = "en-US";

/// Per-request timeout
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Catalog operation, used to tag failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Trending,
    TopRated,
    Popular,
    Genre,
    Search,
    ShowDetails,
    SeasonDetails,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::Trending => "fetch trending shows",
            Operation::TopRated => "fetch top rated shows",
            Operation::Popular => "fetch popular shows",
            Operation::Genre => "fetch genre shows",
            Operation::Search => "search shows",
            Operation::ShowDetails => "fetch show details",
            Operation::SeasonDetails => "fetch season details",
        };
        f.write_str(text)
    }
}

/// Underlying reason a request failed
#[derive(Debug, Error)]
pub enum FetchCause {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Failure of a catalog operation
#[derive(Debug, Error)]
#[error("Failed to {operation}")]
pub struct TmdbError {
    pub operation: Operation,
    #[source]
    pub cause: FetchCause,
}

impl TmdbError {
    pub fn new(operation: Operation, cause: impl Into<FetchCause>) -> Self {
        Self {
            operation,
            cause: cause.into(),
        }
    }
}

/// Client for the TMDB REST API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Creates a client for `base_url` authenticated with `api_key`
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self::with_client(client, api_key, base_url)
    }

    /// Creates a client around a custom HTTP client
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for an endpoint path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GETs `path` and decodes the body, tagging failures with `operation`
    async fn get<T: DeserializeOwned>(
        &self,
        operation: Operation,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        tracing::debug!(%operation, path, "TMDB request");

        self.send(path, params).await.map_err(|cause| {
            tracing::error!(%operation, path, error = %cause, "TMDB request failed");
            TmdbError::new(operation, cause)
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchCause> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchCause::Status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ShowSource for TmdbClient {
    async fn trending(
        &self,
        window: TrendingWindow,
        page: u32,
    ) -> Result<ShowPage<TvShow>, TmdbError> {
        let path = format!("/trending/tv/{}", window.as_str());
        self.get(Operation::Trending, &path, &[("page", page.to_string())])
            .await
    }

    async fn top_rated(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        self.get(Operation::TopRated, "/tv/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn popular(&self, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        self.get(Operation::Popular, "/tv/popular", &[("page", page.to_string())])
            .await
    }

    async fn by_genre(&self, genre_id: u32, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        let params = [
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
        ];
        self.get(Operation::Genre, "/discover/tv", &params).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<ShowPage<TvShow>, TmdbError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ShowPage::empty());
        }
        let params = [("query", query.to_string()), ("page", page.to_string())];
        self.get(Operation::Search, "/search/tv", &params).await
    }

    async fn show_details(&self, show_id: u64) -> Result<ShowDetails, TmdbError> {
        let path = format!("/tv/{}", show_id);
        self.get(Operation::ShowDetails, &path, &[]).await
    }

    async fn season_details(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, TmdbError> {
        let path = format!("/tv/{}/season/{}", show_id, season_number);
        self.get(Operation::SeasonDetails, &path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_message_names_operation() {
        let err = TmdbError::new(Operation::Trending, FetchCause::Status(StatusCode::UNAUTHORIZED));
        assert_eq!(err.to_string(), "Failed to fetch trending shows");

        let source = err.source().expect("cause should be the source");
        assert!(source.to_string().contains("401"));
    }

    #[test]
    fn test_operation_labels() {
        assert_eq!(Operation::TopRated.to_string(), "fetch top rated shows");
        assert_eq!(Operation::Search.to_string(), "search shows");
        assert_eq!(Operation::SeasonDetails.to_string(), "fetch season details");
    }

    #[test]
    fn test_parse_error_converts_into_cause() {
        let parse_err = serde_json::from_str::<TvShow>("{").unwrap_err();
        let err = TmdbError::new(Operation::Popular, parse_err);
        assert!(matches!(err.cause, FetchCause::ParseError(_)));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = TmdbClient::new("key", "https://api.themoviedb.org/3/");
        assert_eq!(client.url("/tv/popular"), "https://api.themoviedb.org/3/tv/popular");
    }

    #[tokio::test]
    async fn test_blank_search_returns_empty_page_without_request() {
        // Unroutable base URL: any real request would fail
        let client = TmdbClient::new("key", "http://127.0.0.1:9");
        let page = client.search("   ", 1).await.expect("blank search should not fail");
        assert_eq!(page, ShowPage::empty());
    }

    #[tokio::test]
    async fn test_connection_failure_is_tagged() {
        let client = TmdbClient::new("key", "http://127.0.0.1:9");
        let err = client.popular(1).await.expect_err("request should fail");
        assert_eq!(err.operation, Operation::Popular);
        assert!(matches!(err.cause, FetchCause::RequestFailed(_)));
    }
}
