//! Image URLs and display formatting

use chrono::NaiveDate;

/// Shown in place of an image URL when the record has no image path
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-poster.svg";

/// Builds image URLs from TMDB file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<size><path>`, or the placeholder without a path
    pub fn image(&self, path: Option<&str>, size: &str) -> String {
        match path {
            Some(path) if !path.is_empty() => format!("{}/{}{}", self.base_url, size, path),
            _ => PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        self.image(path, "w500")
    }

    pub fn backdrop(&self, path: Option<&str>) -> String {
        self.image(path, "w1280")
    }

    pub fn still(&self, path: Option<&str>) -> String {
        self.image(path, "w780")
    }
}

/// Formats `YYYY-MM-DD` as `January 20, 2008`; empty or invalid input is `TBA`
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => "TBA".to_string(),
    }
}

/// Year part of a `YYYY-MM-DD` date
pub fn release_year(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}

/// Rating with one decimal
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// Cuts `text` to at most `max_chars` characters, adding `...` when it cuts
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
