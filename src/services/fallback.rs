//! Second-chance queries for an empty seasonal result.

use tracing::info;

use super::catalog::MediaCatalog;
use crate::clients::ClientError;
use crate::domain::{fallback_seasons, filter_safe_anime, season_year};
use crate::models::{AnimeListParams, Media, MediaSeason};

/// A non-empty result found by a fallback query, already safety-filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    pub media: Vec<Media>,
    pub total: u32,
    pub has_next_page: bool,
    /// Season that produced the result; `None` for the season-less query.
    pub used_season: Option<MediaSeason>,
}

/// Tries the two seasons adjacent to `current` in table order and returns the
/// first one with results. Queries run one after another so the first hit
/// costs no further calls.
pub async fn try_seasonal_fallbacks(
    catalog: &dyn MediaCatalog,
    base: &AnimeListParams,
    current: MediaSeason,
    year: i32,
) -> Result<Option<FallbackResult>, ClientError> {
    for season in fallback_seasons(current) {
        let params = base.with_season(season, season_year(season, current, year));
        let page = catalog.get_anime_list(&params).await?;

        if !page.is_empty() {
            info!(season = %season, year = ?params.season_year, "Found results in fallback season");
            let total = page.total();
            let has_next_page = page.has_next_page();
            return Ok(Some(FallbackResult {
                media: filter_safe_anime(page.media),
                total,
                has_next_page,
                used_season: Some(season),
            }));
        }
    }

    Ok(None)
}

/// Repeats the query with the season filter removed.
pub async fn try_no_season_fallback(
    catalog: &dyn MediaCatalog,
    base: &AnimeListParams,
) -> Result<Option<FallbackResult>, ClientError> {
    let page = catalog.get_anime_list(&base.without_season()).await?;

    if page.is_empty() {
        return Ok(None);
    }

    info!("Found results without a season filter");
    let total = page.total();
    let has_next_page = page.has_next_page();
    Ok(Some(FallbackResult {
        media: filter_safe_anime(page.media),
        total,
        has_next_page,
        used_season: None,
    }))
}
