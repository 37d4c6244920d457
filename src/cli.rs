//! Command-line interface parsing for tvdeck
//!
//! Handles the flags that pick the starting screen (`--show`, `--genre`,
//! `--favorites`, `--trending`) and the maintenance flags (`--clear-cache`,
//! `--log-file`).

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::genres::is_known_genre;
use crate::data::TrendingWindow;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// The genre id is not a TMDB TV genre
    #[error("Invalid genre: '{0}'. Run with --list-genres to see valid ids")]
    InvalidGenre(u32),

    /// More than one starting screen was requested
    #[error("Choose only one of --show, --genre and --favorites")]
    ConflictingScreens,
}

/// tvdeck - Discover TV shows from the terminal
#[derive(Parser, Debug)]
#[command(name = "tvdeck")]
#[command(about = "Browse trending, top rated and popular TV shows, search, and keep favorites")]
#[command(version)]
pub struct Cli {
    /// Trending window used on the home and trending screens
    #[arg(long, value_enum, value_name = "WINDOW", default_value_t = TrendingWindow::Day)]
    pub trending: TrendingWindow,

    /// Open directly on the shows for a genre id (e.g. 16 for Animation)
    #[arg(long, value_name = "ID")]
    pub genre: Option<u32>,

    /// Open directly on a show's detail page
    #[arg(long, value_name = "ID")]
    pub show: Option<u64>,

    /// Open directly on the favorites list
    #[arg(long)]
    pub favorites: bool,

    /// Print the genre ids and exit
    #[arg(long)]
    pub list_genres: bool,

    /// Delete cached responses and saved favorites, then exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Where to write logs (default: tvdeck.log in the cache directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Screen the app opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartScreen {
    #[default]
    Home,
    Genre(u32),
    Show(u64),
    Favorites,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub start_screen: StartScreen,
    pub trending_window: TrendingWindow,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the genre is unknown or several screens were requested
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let requested =
            cli.genre.is_some() as u8 + cli.show.is_some() as u8 + cli.favorites as u8;
        if requested > 1 {
            return Err(CliError::ConflictingScreens);
        }

        let start_screen = match (cli.genre, cli.show, cli.favorites) {
            (Some(genre), _, _) => {
                if !is_known_genre(genre) {
                    return Err(CliError::InvalidGenre(genre));
                }
                StartScreen::Genre(genre)
            }
            (_, Some(show), _) => StartScreen::Show(show),
            (_, _, true) => StartScreen::Favorites,
            _ => StartScreen::Home,
        };

        Ok(StartupConfig {
            start_screen,
            trending_window: cli.trending,
        })
    }
}
