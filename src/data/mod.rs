//! Core data models for tvdeck
//!
//! Records mirror the TMDB v3 JSON payloads. Fields the API sometimes omits or
//! nulls are defaulted so a sparse record still deserializes.

pub mod format;
pub mod genres;
pub mod source;
pub mod tmdb;

pub use format::{format_date, format_rating, release_year, truncate_text, ImageUrls};
pub use genres::{genre_name, Genre, TV_GENRES};
pub use source::ShowSource;
pub use tmdb::{FetchCause, Operation, TmdbClient, TmdbError};

use serde::{Deserialize, Serialize};

/// Window used by the trending endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    #[default]
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }

    /// The other window
    pub fn toggled(self) -> Self {
        match self {
            TrendingWindow::Day => TrendingWindow::Week,
            TrendingWindow::Week => TrendingWindow::Day,
        }
    }
}

/// Show summary as returned by list, discover and search endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    /// `YYYY-MM-DD`, empty when unknown
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_air_date: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub popularity: f64,
}

impl TvShow {
    /// Snapshot of the fields kept in favorites
    pub fn to_favorite(&self) -> FavoriteShow {
        FavoriteShow {
            id: self.id,
            name: self.name.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            first_air_date: self.first_air_date.clone(),
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> ShowPage<T> {
    /// The page returned for a blank search
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

fn first_page() -> u32 {
    1
}

/// Network that airs a show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Season entry on a show detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: String,
}

/// Full show record from `/tv/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_air_date: String,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

impl ShowDetails {
    /// Snapshot of the fields kept in favorites
    pub fn to_favorite(&self) -> FavoriteShow {
        FavoriteShow {
            id: self.id,
            name: self.name.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            vote_average: self.vote_average,
            first_air_date: self.first_air_date.clone(),
        }
    }

    /// Season numbers in display order, specials (season 0) last
    pub fn season_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.seasons.iter().map(|s| s.season_number).collect();
        numbers.sort_by_key(|n| (*n == 0, *n));
        numbers
    }
}

/// A single episode inside a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub episode_number: u32,
    #[serde(default)]
    pub season_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

/// Season record from `/tv/{id}/season/{n}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub season_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Show fields persisted in the favorites blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub first_air_date: String,
}

impl From<FavoriteShow> for TvShow {
    fn from(favorite: FavoriteShow) -> Self {
        TvShow {
            id: favorite.id,
            name: favorite.name,
            overview: String::new(),
            poster_path: favorite.poster_path,
            backdrop_path: favorite.backdrop_path,
            vote_average: favorite.vote_average,
            vote_count: 0,
            first_air_date: favorite.first_air_date,
            original_language: String::new(),
            genre_ids: Vec::new(),
            origin_country: Vec::new(),
            popularity: 0.0,
        }
    }
}

/// TMDB sends `null` for some dates; treat it like an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
