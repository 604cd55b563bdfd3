//! Session-scoped browsing. Each session owns one [`BrowseState`]; every
//! request loads it, runs one action, and writes it back.

use axum::{Json, extract::State};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{parse_season, parse_sort};
use super::{ApiError, ApiResponse, AppState, BrowseViewDto, FilterUpdate};
use crate::services::{BrowseState, Browser};

const BROWSE_STATE_KEY: &str = "browse_state";

type BrowseResponse = Result<Json<ApiResponse<BrowseViewDto>>, ApiError>;

async fn open_browser(state: &AppState, session: &Session) -> Result<Browser, ApiError> {
    let stored = session
        .get::<BrowseState>(BROWSE_STATE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read session: {e}")))?;

    let browse = stored
        .unwrap_or_else(|| BrowseState::for_date(state.today(), state.config.browse.items_per_page));

    Ok(Browser::new(state.catalog(), browse).with_reference_date(state.today()))
}

async fn close_browser(state: &AppState, session: &Session, browser: Browser) -> BrowseResponse {
    let browse = browser.into_state();
    let view = BrowseViewDto::from_state(&browse, &state.config.images);

    session
        .insert(BROWSE_STATE_KEY, browse)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to write session: {e}")))?;

    Ok(Json(ApiResponse::success(view)))
}

pub async fn get_browse(State(state): State<Arc<AppState>>, session: Session) -> BrowseResponse {
    let mut browser = open_browser(&state, &session).await?;
    browser.load_initial_data().await;
    close_browser(&state, &session, browser).await
}

pub async fn load_more(State(state): State<Arc<AppState>>, session: Session) -> BrowseResponse {
    let mut browser = open_browser(&state, &session).await?;
    browser.load_more_data().await;
    close_browser(&state, &session, browser).await
}

pub async fn update_filters(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(update): Json<FilterUpdate>,
) -> BrowseResponse {
    // Parse everything first so a bad field leaves the session untouched.
    let sort = update.sort.as_deref().map(parse_sort).transpose()?;
    let season = update.season.as_deref().map(parse_season).transpose()?;

    let browser = open_browser(&state, &session).await?;
    let mut browse = browser.into_state();

    if let Some(search) = update.search {
        browse.search_query = search;
    }
    if let Some(sort) = sort {
        browse.selected_sort = sort;
    }
    if let Some(season) = season {
        browse.selected_season = season;
    }

    let mut browser = Browser::new(state.catalog(), browse).with_reference_date(state.today());
    browser.load_anime(true).await;
    close_browser(&state, &session, browser).await
}

pub async fn clear_filters(State(state): State<Arc<AppState>>, session: Session) -> BrowseResponse {
    let mut browser = open_browser(&state, &session).await?;
    browser.clear_filters().await;
    close_browser(&state, &session, browser).await
}

pub async fn reset(State(state): State<Arc<AppState>>, session: Session) -> BrowseResponse {
    let mut browser = open_browser(&state, &session).await?;
    browser.reset_state();
    close_browser(&state, &session, browser).await
}
