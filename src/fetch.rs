//! Background fetches for the UI loop
//!
//! The UI never awaits the network. It hands `FetchRequest`s to a
//! `FetchHandle`, which runs each one as its own task against the `Catalog`
//! and sends the `FetchOutcome` back over a channel that the UI drains between
//! frames. Nothing is cancelled: every request's outcome is delivered.

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::data::{SeasonDetails, ShowDetails, ShowPage, TrendingWindow, TvShow};

/// Outcomes buffered before senders wait
const CHANNEL_CAPACITY: usize = 32;

/// Work the UI wants done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Trending(TrendingWindow),
    TopRated,
    Popular,
    Genre(u32),
    ShowDetails(u64),
    Season { show_id: u64, season_number: u32 },
    Search(String),
    Suggest(String),
}

/// Result of a `FetchRequest`; errors are already user-facing messages
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Trending(TrendingWindow, Result<Vec<TvShow>, String>),
    TopRated(Result<Vec<TvShow>, String>),
    Popular(Result<Vec<TvShow>, String>),
    Genre(u32, Result<Vec<TvShow>, String>),
    ShowDetails(u64, Result<ShowDetails, String>),
    Season {
        show_id: u64,
        season_number: u32,
        result: Result<SeasonDetails, String>,
    },
    Search(Result<ShowPage<TvShow>, String>),
    Suggest(Result<ShowPage<TvShow>, String>),
}

/// Runs one request to completion
pub async fn run(catalog: &Catalog, request: FetchRequest) -> FetchOutcome {
    fn results(page: ShowPage<TvShow>) -> Vec<TvShow> {
        page.results
    }

    match request {
        FetchRequest::Trending(window) => FetchOutcome::Trending(
            window,
            catalog.trending(window, 1).await.map(results).map_err(|e| e.to_string()),
        ),
        FetchRequest::TopRated => FetchOutcome::TopRated(
            catalog.top_rated(1).await.map(results).map_err(|e| e.to_string()),
        ),
        FetchRequest::Popular => FetchOutcome::Popular(
            catalog.popular(1).await.map(results).map_err(|e| e.to_string()),
        ),
        FetchRequest::Genre(genre_id) => FetchOutcome::Genre(
            genre_id,
            catalog
                .shows_by_genre(genre_id, 1)
                .await
                .map(results)
                .map_err(|e| e.to_string()),
        ),
        FetchRequest::ShowDetails(show_id) => FetchOutcome::ShowDetails(
            show_id,
            catalog.show_details(show_id).await.map_err(|e| e.to_string()),
        ),
        FetchRequest::Season {
            show_id,
            season_number,
        } => FetchOutcome::Season {
            show_id,
            season_number,
            result: catalog
                .season_details(show_id, season_number)
                .await
                .map_err(|e| e.to_string()),
        },
        FetchRequest::Search(query) => {
            FetchOutcome::Search(catalog.search(&query, 1).await.map_err(|e| e.to_string()))
        }
        FetchRequest::Suggest(query) => {
            FetchOutcome::Suggest(catalog.search(&query, 1).await.map_err(|e| e.to_string()))
        }
    }
}

/// Spawns fetches and collects their outcomes
pub struct FetchHandle {
    catalog: Catalog,
    sender: mpsc::Sender<FetchOutcome>,
    receiver: mpsc::Receiver<FetchOutcome>,
}

impl FetchHandle {
    pub fn new(catalog: Catalog) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            catalog,
            sender,
            receiver,
        }
    }

    /// Starts `request` on the runtime; must be called from within tokio
    pub fn dispatch(&self, request: FetchRequest) {
        let catalog = self.catalog.clone();
        let sender = self.sender.clone();
        tracing::debug!(?request, "Dispatching fetch");
        tokio::spawn(async move {
            let outcome = run(&catalog, request).await;
            let _ = sender.send(outcome).await;
        });
    }

    /// Starts a batch of requests as one task, sending each outcome as it finishes
    pub fn dispatch_all(&self, requests: Vec<FetchRequest>) {
        if requests.is_empty() {
            return;
        }
        let catalog = self.catalog.clone();
        let sender = self.sender.clone();
        tracing::debug!(count = requests.len(), "Dispatching fetch batch");
        tokio::spawn(async move {
            let mut pending: FuturesUnordered<_> = requests
                .into_iter()
                .map(|request| run(&catalog, request))
                .collect();
            while let Some(outcome) = pending.next().await {
                if sender.send(outcome).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Returns a finished outcome without waiting
    pub fn try_recv(&mut self) -> Option<FetchOutcome> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished outcome
    pub async fn recv(&mut self) -> Option<FetchOutcome> {
        self.receiver.recv().await
    }
}
