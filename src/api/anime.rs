use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    parse_season, validate_anime_id, validate_page, validate_per_page, validate_search_query,
};
use super::{
    AnimeDetailDto, ApiError, ApiResponse, AppState, CacheInvalidationDto, CacheStatsDto, PageDto,
};
use crate::config::ImageConfig;
use crate::domain::{current_season, filter_safe_anime, is_safe, season_year};
use crate::models::Page;

const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PagingQuery {
    fn resolve(&self) -> Result<(u32, u32), ApiError> {
        Ok((
            validate_page(self.page.unwrap_or(1))?,
            validate_per_page(self.per_page.unwrap_or(DEFAULT_PER_PAGE))?,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalQuery {
    pub season: Option<String>,
    pub year: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct InvalidateQuery {
    pub pattern: Option<String>,
}

fn safe_page(mut page: Page, images: &ImageConfig) -> PageDto {
    page.media = filter_safe_anime(page.media);
    PageDto::from_page(&page, images)
}

pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AnimeDetailDto>>, ApiError> {
    let id = validate_anime_id(id)?;
    let media = state.client.get_anime_details(id).await?;

    if !is_safe(&media) {
        return Err(ApiError::anime_not_found(id));
    }

    Ok(Json(ApiResponse::success(AnimeDetailDto::from_media(
        &media,
        &state.config.images,
    ))))
}

pub async fn get_trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PagingQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let (page, per_page) = query.resolve()?;
    let result = state.client.get_trending_anime(page, per_page).await?;
    Ok(Json(ApiResponse::success(safe_page(
        result,
        &state.config.images,
    ))))
}

pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let search = validate_search_query(&query.q)?;
    let (page, per_page) = PagingQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve()?;

    let result = state.client.search_anime(search, page, per_page).await?;
    Ok(Json(ApiResponse::success(safe_page(
        result,
        &state.config.images,
    ))))
}

/// Defaults to the current season; an explicit season without a year gets
/// the year a viewer today would mean by it.
pub async fn get_seasonal(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeasonalQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let (page, per_page) = PagingQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .resolve()?;

    let (current, this_year) = current_season(state.today());
    let season = parse_season(query.season.as_deref().unwrap_or(""))?.unwrap_or(current);
    let year = query
        .year
        .unwrap_or_else(|| season_year(season, current, this_year));

    let result = state
        .client
        .get_seasonal_anime(season, year, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(safe_page(
        result,
        &state.config.images,
    ))))
}

pub async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CacheStatsDto>> {
    Json(ApiResponse::success(CacheStatsDto {
        size: state.client.cache_size(),
        keys: state.client.cache_keys(),
    }))
}

pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InvalidateQuery>,
) -> Json<ApiResponse<CacheInvalidationDto>> {
    let removed = match query.pattern.as_deref().filter(|p| !p.is_empty()) {
        Some(pattern) => state.client.invalidate_cache(pattern),
        None => {
            let size = state.client.cache_size();
            state.client.clear_cache();
            size
        }
    };

    tracing::info!(removed, "API cache invalidated");
    Json(ApiResponse::success(CacheInvalidationDto { removed }))
}

pub async fn get_image_config(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ImageConfig>> {
    Json(ApiResponse::success(state.config.images.clone()))
}
