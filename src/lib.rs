//! tvdeck library
//!
//! Discover TV shows from the terminal: a TMDB client behind a two-tier TTL
//! cache, a favorites store that expires after two hours and stays in sync
//! across running instances, and debounced type-ahead search. The binary wires
//! these into a ratatui interface; the modules are public for integration
//! tests.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod data;
pub mod events;
pub mod favorites;
pub mod fetch;
pub mod logging;
pub mod search;
pub mod sync;
pub mod ui;
