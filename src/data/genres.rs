//! TMDB TV genre table

use serde::{Deserialize, Serialize};

/// A TV genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// TV genres known to TMDB, in menu order
pub const TV_GENRES: [(u32, &str); 16] = [
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

/// Name for a genre id, `"Genre"` when unknown
pub fn genre_name(id: u32) -> &'static str {
    TV_GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
        .unwrap_or("Genre")
}

/// Whether `id` is one of the known TV genres
pub fn is_known_genre(id: u32) -> bool {
    TV_GENRES.iter().any(|(genre_id, _)| *genre_id == id)
}

/// Genre after `id` in menu order, wrapping around
pub fn next_genre(id: u32) -> u32 {
    let index = position(id).map(|i| (i + 1) % TV_GENRES.len()).unwrap_or(0);
    TV_GENRES[index].0
}

/// Genre before `id` in menu order, wrapping around
pub fn previous_genre(id: u32) -> u32 {
    let index = match position(id) {
        Some(0) | None => TV_GENRES.len() - 1,
        Some(i) => i - 1,
    };
    TV_GENRES[index].0
}

fn position(id: u32) -> Option<usize> {
    TV_GENRES.iter().position(|(genre_id, _)| *genre_id == id)
}
