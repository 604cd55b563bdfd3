//! Browse state and the load orchestration behind it.
//!
//! [`BrowseState`] is plain data (the server keeps one per session);
//! [`Browser`] pairs it with a catalog and implements the load, reset,
//! append and fallback rules.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::catalog::MediaCatalog;
use super::fallback::{FallbackResult, try_no_season_fallback, try_seasonal_fallbacks};
use crate::clients::ClientError;
use crate::domain::{current_season, filter_safe_anime, season_year};
use crate::models::{AnimeListParams, Media, MediaSeason, MediaSort, Page};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load anime data. Please try again.";

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 50;

/// Accumulated results for one (search, sort, season) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCacheEntry {
    pub data: Vec<Media>,
    pub page: u32,
    pub has_more: bool,
}

#[must_use]
pub fn filter_cache_key(search: &str, sort: MediaSort, season: Option<MediaSeason>) -> String {
    let season = season.map(|s| s.as_str()).unwrap_or_default();
    format!("{search}-{sort}-{season}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseState {
    pub current_anime: Vec<Media>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub selected_sort: MediaSort,
    pub selected_season: Option<MediaSeason>,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_available: u32,
    pub has_next_page: bool,
    /// Never evicted; only [`Browser::reset_state`] empties it.
    pub cache: HashMap<String, FilterCacheEntry>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new(None, DEFAULT_ITEMS_PER_PAGE)
    }
}

impl BrowseState {
    #[must_use]
    pub fn new(season: Option<MediaSeason>, items_per_page: u32) -> Self {
        Self {
            current_anime: Vec::new(),
            loading: false,
            loading_more: false,
            error: None,
            search_query: String::new(),
            selected_sort: MediaSort::PopularityDesc,
            selected_season: season,
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_available: 0,
            has_next_page: true,
            cache: HashMap::new(),
        }
    }

    /// Initial state for a viewer on `today`: the current season selected.
    #[must_use]
    pub fn for_date(today: NaiveDate, items_per_page: u32) -> Self {
        let (season, _) = current_season(today);
        Self::new(Some(season), items_per_page)
    }

    #[must_use]
    pub fn cache_key(&self) -> String {
        filter_cache_key(&self.search_query, self.selected_sort, self.selected_season)
    }
}

pub struct Browser {
    catalog: Arc<dyn MediaCatalog>,
    state: BrowseState,
    reference_date: Option<NaiveDate>,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("state", &self.state)
            .field("reference_date", &self.reference_date)
            .finish_non_exhaustive()
    }
}

impl Browser {
    #[must_use]
    pub fn new(catalog: Arc<dyn MediaCatalog>, state: BrowseState) -> Self {
        Self {
            catalog,
            state,
            reference_date: None,
        }
    }

    /// Pins "today" for season arithmetic instead of reading the clock.
    #[must_use]
    pub const fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub const fn state(&self) -> &BrowseState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> BrowseState {
        self.state
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Query parameters for the current filters and page. Adult content is
    /// excluded at the query level; results are still safety-filtered.
    #[must_use]
    pub fn api_params(&self) -> AnimeListParams {
        let mut builder = AnimeListParams::builder()
            .page(self.state.current_page)
            .per_page(self.state.items_per_page)
            .sort(vec![self.state.selected_sort])
            .adult_content(false);

        let search = self.state.search_query.trim();
        if !search.is_empty() {
            builder = builder.search(search);
        }

        if let Some(selected) = self.state.selected_season {
            let (current, year) = current_season(self.today());
            builder = builder.season(selected, season_year(selected, current, year));
        }

        builder.build()
    }

    /// Loads results for the current filters.
    ///
    /// With `reset` the displayed list is replaced (served from the filter
    /// cache when possible); without it the current page is appended.
    pub async fn load_anime(&mut self, reset: bool) {
        let key = self.state.cache_key();

        if reset && let Some(cached) = self.state.cache.get(&key).cloned() {
            debug!(key = %key, "Serving browse results from filter cache");
            self.state.current_anime = cached.data;
            self.state.has_next_page = cached.has_more;
            self.state.current_page = cached.page;
            return;
        }

        let had_data = !self.state.current_anime.is_empty();
        self.begin_loading(reset);

        if let Err(err) = self.fetch(reset, &key).await {
            self.handle_load_error(&err, reset, had_data);
        }

        self.finish_loading();
    }

    fn begin_loading(&mut self, reset: bool) {
        self.state.error = None;
        if reset {
            self.state.loading = true;
            self.state.current_page = 1;
        } else {
            self.state.loading_more = true;
        }
    }

    fn finish_loading(&mut self) {
        self.state.loading = false;
        self.state.loading_more = false;
    }

    async fn fetch(&mut self, reset: bool, key: &str) -> Result<(), ClientError> {
        let params = self.api_params();
        let page = self.catalog.get_anime_list(&params).await?;

        if page.is_empty() && self.should_fall_back(reset) && self.run_fallbacks(&params, key).await? {
            return Ok(());
        }

        self.apply_page(page, reset, key);
        Ok(())
    }

    /// Fallback only rescues a fresh, seasonal, still-empty view. An empty
    /// page N+1 or an empty result behind existing data is left alone.
    fn should_fall_back(&self, reset: bool) -> bool {
        reset && self.state.selected_season.is_some() && self.state.current_anime.is_empty()
    }

    async fn run_fallbacks(
        &mut self,
        params: &AnimeListParams,
        key: &str,
    ) -> Result<bool, ClientError> {
        let (current, year) = current_season(self.today());

        if let Some(found) =
            try_seasonal_fallbacks(self.catalog.as_ref(), params, current, year).await?
        {
            self.state.selected_season = found.used_season;
            self.adopt_fallback(found, key);
            return Ok(true);
        }

        if let Some(found) = try_no_season_fallback(self.catalog.as_ref(), params).await? {
            self.state.selected_season = None;
            self.adopt_fallback(found, key);
            return Ok(true);
        }

        Ok(false)
    }

    fn adopt_fallback(&mut self, found: FallbackResult, key: &str) {
        self.state.current_anime = found.media;
        self.state.total_available = found.total;
        self.state.has_next_page = found.has_next_page;
        self.remember(key);
    }

    fn apply_page(&mut self, page: Page, reset: bool, key: &str) {
        let total = page.total();
        let has_next_page = page.has_next_page();
        let filtered = filter_safe_anime(page.media);

        if reset {
            self.state.current_anime = filtered;
        } else {
            self.state.current_anime.extend(filtered);
        }

        self.state.total_available = total;
        self.state.has_next_page = has_next_page;
        self.remember(key);
    }

    fn remember(&mut self, key: &str) {
        self.state.cache.insert(
            key.to_string(),
            FilterCacheEntry {
                data: self.state.current_anime.clone(),
                page: self.state.current_page,
                has_more: self.state.has_next_page,
            },
        );
    }

    fn handle_load_error(&mut self, err: &ClientError, reset: bool, had_data: bool) {
        error!(error = %err, code = err.code(), reset, "Error loading anime data");
        self.state.error = Some(LOAD_ERROR_MESSAGE.to_string());

        if reset {
            if !had_data {
                self.state.current_anime.clear();
            }
        } else {
            // The page never arrived; asking again should request it again.
            self.state.current_page = self.state.current_page.saturating_sub(1).max(1);
        }
    }

    /// First load; does nothing when data is already shown or a load is running.
    pub async fn load_initial_data(&mut self) {
        if self.state.current_anime.is_empty() && !self.state.loading {
            self.load_anime(true).await;
        }
    }

    pub async fn load_more_data(&mut self) {
        if self.state.loading || self.state.loading_more || !self.state.has_next_page {
            return;
        }
        self.state.current_page += 1;
        self.load_anime(false).await;
    }

    pub async fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.load_anime(true).await;
    }

    pub async fn set_sort(&mut self, sort: MediaSort) {
        self.state.selected_sort = sort;
        self.load_anime(true).await;
    }

    pub async fn set_season(&mut self, season: Option<MediaSeason>) {
        self.state.selected_season = season;
        self.load_anime(true).await;
    }

    pub async fn clear_filters(&mut self) {
        self.state.search_query.clear();
        self.state.selected_sort = MediaSort::PopularityDesc;
        self.state.selected_season = None;
        self.load_anime(true).await;
    }

    /// Empties results, flags and the filter cache. Filter selections stay.
    pub fn reset_state(&mut self) {
        self.state.current_anime.clear();
        self.state.loading = false;
        self.state.loading_more = false;
        self.state.error = None;
        self.state.current_page = 1;
        self.state.total_available = 0;
        self.state.has_next_page = true;
        self.state.cache.clear();
    }

    #[must_use]
    pub fn get_anime_by_id(&self, id: i32) -> Option<&Media> {
        self.state.current_anime.iter().find(|m| m.id == id)
    }

    /// Always fetched fresh from the catalog, never from the browse list.
    pub async fn load_anime_details(&self, id: i32) -> Result<Media, ClientError> {
        self.catalog
            .get_anime_details(id)
            .await
            .inspect_err(|e| error!(id, error = %e, "Error loading anime details"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EmptyCatalog;

    #[async_trait]
    impl MediaCatalog for EmptyCatalog {
        async fn get_anime_list(&self, _params: &AnimeListParams) -> Result<Page, ClientError> {
            Err(ClientError::Validation("unused".to_string()))
        }

        async fn get_anime_details(&self, _id: i32) -> Result<Media, ClientError> {
            Err(ClientError::Validation("unused".to_string()))
        }
    }

    fn browser(state: BrowseState, today: NaiveDate) -> Browser {
        Browser::new(Arc::new(EmptyCatalog), state).with_reference_date(today)
    }

    #[test]
    fn test_filter_cache_key() {
        assert_eq!(
            filter_cache_key("", MediaSort::PopularityDesc, Some(MediaSeason::Winter)),
            "-POPULARITY_DESC-WINTER"
        );
        assert_eq!(
            filter_cache_key("frieren", MediaSort::ScoreDesc, None),
            "frieren-SCORE_DESC-"
        );
    }

    #[test]
    fn test_initial_state_selects_current_season() {
        let state = BrowseState::for_date(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(), 50);
        assert_eq!(state.selected_season, Some(MediaSeason::Summer));
        assert_eq!(state.selected_sort, MediaSort::PopularityDesc);
        assert_eq!(state.current_page, 1);
        assert!(state.has_next_page);
    }

    #[test]
    fn test_api_params_trim_search_and_adjust_year() {
        let mut state = BrowseState::new(Some(MediaSeason::Winter), 50);
        state.search_query = "  frieren ".to_string();
        let october = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();

        let params = browser(state, october).api_params();
        assert_eq!(params.search.as_deref(), Some("frieren"));
        assert_eq!(params.season, Some(MediaSeason::Winter));
        assert_eq!(params.season_year, Some(2026));
        assert_eq!(params.is_adult, Some(false));
        assert_eq!(params.per_page, Some(50));
        assert_eq!(params.sort, Some(vec![MediaSort::PopularityDesc]));
    }

    #[test]
    fn test_api_params_without_filters() {
        let state = BrowseState::new(None, 20);
        let params = browser(state, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).api_params();
        assert_eq!(params.search, None);
        assert_eq!(params.season, None);
        assert_eq!(params.season_year, None);
        assert_eq!(params.page, Some(1));
    }

    #[test]
    fn test_reset_state_keeps_filters() {
        let mut state = BrowseState::new(Some(MediaSeason::Fall), 50);
        state.search_query = "mecha".to_string();
        state.current_anime.push(Media::new(1, "A"));
        state.current_page = 4;
        state.error = Some(LOAD_ERROR_MESSAGE.to_string());
        state.cache.insert(
            "k".to_string(),
            FilterCacheEntry {
                data: Vec::new(),
                page: 1,
                has_more: false,
            },
        );

        let mut b = browser(state, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        b.reset_state();

        let state = b.state();
        assert!(state.current_anime.is_empty());
        assert!(state.cache.is_empty());
        assert_eq!(state.current_page, 1);
        assert_eq!(state.error, None);
        assert!(state.has_next_page);
        assert_eq!(state.search_query, "mecha");
        assert_eq!(state.selected_season, Some(MediaSeason::Fall));
    }
}
