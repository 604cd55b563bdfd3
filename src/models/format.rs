//! Display helpers shared by the CLI and the browse API.

use super::media::{FuzzyDate, MediaCoverImage, MediaFormat, MediaStatus, MediaTitle};

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// English, then romaji, then native; empty strings count as missing.
#[must_use]
pub fn display_title(title: &MediaTitle) -> &str {
    non_empty(title.english.as_ref())
        .or_else(|| non_empty(title.romaji.as_ref()))
        .or_else(|| non_empty(title.native.as_ref()))
        .unwrap_or("Unknown Title")
}

/// Largest available cover variant.
#[must_use]
pub fn safe_image_url(cover: &MediaCoverImage) -> Option<&str> {
    non_empty(cover.extra_large.as_ref())
        .or_else(|| non_empty(cover.large.as_ref()))
        .or_else(|| non_empty(cover.medium.as_ref()))
}

#[must_use]
pub fn format_score(score: Option<i32>) -> String {
    match score {
        Some(s) if s != 0 => format!("{s}%"),
        _ => "N/A".to_string(),
    }
}

#[must_use]
pub fn format_year(date: Option<&FuzzyDate>) -> String {
    date.and_then(|d| d.year)
        .map_or_else(|| "TBA".to_string(), |y| y.to_string())
}

#[must_use]
pub const fn format_status(status: Option<MediaStatus>) -> &'static str {
    match status {
        Some(MediaStatus::Finished) => "Completed",
        Some(MediaStatus::Releasing) => "Airing",
        Some(MediaStatus::NotYetReleased) => "Upcoming",
        Some(MediaStatus::Cancelled) => "Cancelled",
        Some(MediaStatus::Hiatus) => "Hiatus",
        None => "Unknown",
    }
}

#[must_use]
pub fn format_media_format(format: Option<MediaFormat>) -> String {
    format.map_or_else(|| "Unknown".to_string(), |f| f.as_str().replace('_', " "))
}

/// Renders an HTML description as wrapped plain text.
#[must_use]
pub fn plain_description(html: &str, width: usize) -> String {
    html2text::from_read(html.as_bytes(), width.max(20))
        .map_or_else(|_| html.to_string(), |text| text.trim_end().to_string())
}
