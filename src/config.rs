//! Environment configuration
//!
//! The API key is mandatory and read once at startup; a missing key is fatal.
//! Base URLs fall back to TMDB's public endpoints. A `.env` file in the working
//! directory is honored.

use std::path::PathBuf;
use thiserror::Error;

use crate::data::tmdb::DEFAULT_BASE_URL;

/// Default base URL for TMDB images
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const API_KEY_VAR: &str = "TMDB_API_KEY";
pub const BASE_URL_VAR: &str = "TMDB_BASE_URL";
pub const IMAGE_BASE_URL_VAR: &str = "TMDB_IMAGE_BASE_URL";
pub const CACHE_DIR_VAR: &str = "TVDECK_CACHE_DIR";

/// Errors raised while loading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No API key was supplied
    #[error("TMDB API key is not configured. Please set {API_KEY_VAR} in your environment variables.")]
    MissingApiKey,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    /// Overrides the XDG cache directory for the durable store
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            image_base_url: non_empty(IMAGE_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            cache_dir: non_empty(CACHE_DIR_VAR).map(PathBuf::from),
        })
    }
}
