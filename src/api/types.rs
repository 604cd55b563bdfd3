use serde::{Deserialize, Serialize};

use crate::config::ImageConfig;
use crate::models::format::{
    display_title, format_media_format, format_score, format_status, format_year,
    safe_image_url,
};
use crate::models::{Media, MediaSeason, MediaSort, Page};
use crate::services::BrowseState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One tile in a result grid.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnimeCardDto {
    pub id: i32,
    pub title: String,
    /// Only set when the image host is allowlisted.
    pub image: Option<String>,
    pub color: Option<String>,
    pub score: String,
    pub year: String,
    pub status: String,
    pub format: String,
    pub episodes: Option<i32>,
    pub genres: Vec<String>,
}

impl AnimeCardDto {
    #[must_use]
    pub fn from_media(media: &Media, images: &ImageConfig) -> Self {
        Self {
            id: media.id,
            title: display_title(&media.title).to_string(),
            image: safe_image_url(&media.cover_image)
                .filter(|url| images.is_allowed(url))
                .map(str::to_string),
            color: media.cover_image.color.clone(),
            score: format_score(media.average_score),
            year: format_year(media.start_date.as_ref()),
            status: format_status(media.status).to_string(),
            format: format_media_format(media.format),
            episodes: media.episodes,
            genres: media.genres.clone(),
        }
    }

    #[must_use]
    pub fn from_list(media: &[Media], images: &ImageConfig) -> Vec<Self> {
        media.iter().map(|m| Self::from_media(m, images)).collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetailDto {
    #[serde(flatten)]
    pub card: AnimeCardDto,
    pub romaji: Option<String>,
    pub native: Option<String>,
    /// HTML as delivered by the catalog.
    pub description: Option<String>,
    pub banner_image: Option<String>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<i32>,
    pub duration: Option<i32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub studios: Vec<String>,
    pub source: Option<String>,
}

impl AnimeDetailDto {
    #[must_use]
    pub fn from_media(media: &Media, images: &ImageConfig) -> Self {
        Self {
            card: AnimeCardDto::from_media(media, images),
            romaji: media.title.romaji.clone(),
            native: media.title.native.clone(),
            description: media.description.clone(),
            banner_image: media
                .banner_image
                .clone()
                .filter(|url| images.is_allowed(url)),
            season: media.season,
            season_year: media.season_year,
            duration: media.duration,
            popularity: media.popularity,
            favourites: media.favourites,
            studios: media.studio_names().into_iter().map(String::from).collect(),
            source: media.source.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto {
    pub items: Vec<AnimeCardDto>,
    pub total: u32,
    pub current_page: Option<u32>,
    pub has_next_page: bool,
}

impl PageDto {
    /// `page` must already be safety-filtered.
    #[must_use]
    pub fn from_page(page: &Page, images: &ImageConfig) -> Self {
        Self {
            items: AnimeCardDto::from_list(&page.media, images),
            total: page.total(),
            current_page: page.page_info.current_page,
            has_next_page: page.has_next_page(),
        }
    }
}

/// What a browse screen renders: the list plus the filter and paging state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseViewDto {
    pub items: Vec<AnimeCardDto>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub sort: MediaSort,
    pub season: Option<MediaSeason>,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_available: u32,
    pub has_next_page: bool,
}

impl BrowseViewDto {
    #[must_use]
    pub fn from_state(state: &BrowseState, images: &ImageConfig) -> Self {
        Self {
            items: AnimeCardDto::from_list(&state.current_anime, images),
            loading: state.loading,
            loading_more: state.loading_more,
            error: state.error.clone(),
            search_query: state.search_query.clone(),
            sort: state.selected_sort,
            season: state.selected_season,
            current_page: state.current_page,
            items_per_page: state.items_per_page,
            total_available: state.total_available,
            has_next_page: state.has_next_page,
        }
    }
}

/// Body of `PUT /api/browse/filters`. Absent fields keep their value;
/// `season: ""` clears the season.
#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsDto {
    pub size: usize,
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheInvalidationDto {
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaCoverImage, MediaStatus};

    #[test]
    fn test_card_drops_foreign_images() {
        let images = ImageConfig::default();

        let mut media = Media::new(1, "Sousou no Frieren");
        media.average_score = Some(91);
        media.status = Some(MediaStatus::Finished);
        media.cover_image = MediaCoverImage {
            large: Some("https://s4.anilist.co/file/cover.jpg".to_string()),
            ..MediaCoverImage::default()
        };

        let card = AnimeCardDto::from_media(&media, &images);
        assert_eq!(card.title, "Sousou no Frieren");
        assert_eq!(card.score, "91%");
        assert_eq!(card.status, "Completed");
        assert_eq!(
            card.image.as_deref(),
            Some("https://s4.anilist.co/file/cover.jpg")
        );

        media.cover_image.large = Some("https://elsewhere.example/cover.jpg".to_string());
        let card = AnimeCardDto::from_media(&media, &images);
        assert_eq!(card.image, None);
    }

    #[test]
    fn test_browse_view_serializes_camel_case() {
        let state = BrowseState::new(Some(MediaSeason::Spring), 50);
        let view = BrowseViewDto::from_state(&state, &ImageConfig::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["season"], "SPRING");
        assert_eq!(json["sort"], "POPULARITY_DESC");
        assert_eq!(json["itemsPerPage"], 50);
        assert_eq!(json["hasNextPage"], true);
    }
}
