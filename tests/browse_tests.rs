use anichart::clients::ClientError;
use anichart::models::{AnimeListParams, Media, MediaSeason, MediaSort, Page, PageInfo};
use anichart::services::{BrowseState, Browser, LOAD_ERROR_MESSAGE, MediaCatalog};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Answers list queries from a queue and records every request. An empty
/// queue answers with an empty page.
#[derive(Default)]
struct ScriptedCatalog {
    replies: Mutex<VecDeque<Result<Page, ClientError>>>,
    calls: Mutex<Vec<AnimeListParams>>,
}

impl ScriptedCatalog {
    fn with_replies(replies: Vec<Result<Page, ClientError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<AnimeListParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaCatalog for ScriptedCatalog {
    async fn get_anime_list(&self, params: &AnimeListParams) -> Result<Page, ClientError> {
        self.calls.lock().unwrap().push(params.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(&[], false)))
    }

    async fn get_anime_details(&self, id: i32) -> Result<Media, ClientError> {
        Ok(Media::new(id, format!("Details {id}")))
    }
}

fn page(ids: &[i32], has_next_page: bool) -> Page {
    Page {
        page_info: PageInfo {
            total: Some(100),
            has_next_page: Some(has_next_page),
            ..PageInfo::default()
        },
        media: ids.iter().map(|&id| Media::new(id, format!("Anime {id}"))).collect(),
    }
}

fn network_error() -> ClientError {
    ClientError::Network {
        message: "Could not reach catalog".to_string(),
        source: None,
    }
}

fn january() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn browser(catalog: &Arc<ScriptedCatalog>, season: Option<MediaSeason>) -> Browser {
    Browser::new(catalog.clone(), BrowseState::new(season, 50)).with_reference_date(january())
}

fn ids(browser: &Browser) -> Vec<i32> {
    browser.state().current_anime.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_empty_winter_falls_back_to_fall() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[], false)),
        Ok(page(&[1, 2, 3], true)),
    ]);
    let mut b = browser(&catalog, Some(MediaSeason::Winter));

    b.load_initial_data().await;

    assert_eq!(ids(&b), vec![1, 2, 3]);
    assert_eq!(b.state().selected_season, Some(MediaSeason::Fall));
    assert!(b.state().has_next_page);
    assert!(!b.state().loading);
    assert_eq!(b.state().error, None);

    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].season, Some(MediaSeason::Winter));
    assert_eq!(calls[0].season_year, Some(2026));
    assert_eq!(calls[1].season, Some(MediaSeason::Fall));
    // Fall seen from January is last year's fall.
    assert_eq!(calls[1].season_year, Some(2025));
}

#[tokio::test]
async fn test_fallback_tries_second_season_then_no_season() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[], false)),
        Ok(page(&[], false)),
        Ok(page(&[], false)),
        Ok(page(&[9], false)),
    ]);
    let mut b = browser(&catalog, Some(MediaSeason::Winter));

    b.load_anime(true).await;

    let calls = catalog.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[1].season, Some(MediaSeason::Fall));
    assert_eq!(calls[2].season, Some(MediaSeason::Summer));
    assert_eq!(calls[2].season_year, Some(2025));
    assert_eq!(calls[3].season, None);
    assert_eq!(calls[3].season_year, None);

    assert_eq!(ids(&b), vec![9]);
    assert_eq!(b.state().selected_season, None);
}

#[tokio::test]
async fn test_everything_empty_is_final() {
    let catalog = ScriptedCatalog::with_replies(Vec::new());
    let mut b = browser(&catalog, Some(MediaSeason::Spring));

    b.load_anime(true).await;

    assert_eq!(catalog.calls().len(), 4);
    assert!(b.state().current_anime.is_empty());
    assert_eq!(b.state().selected_season, Some(MediaSeason::Spring));
    assert_eq!(b.state().error, None);
}

#[tokio::test]
async fn test_no_fallback_without_season() {
    let catalog = ScriptedCatalog::with_replies(Vec::new());
    let mut b = browser(&catalog, None);

    b.load_anime(true).await;

    assert_eq!(catalog.calls().len(), 1);
    assert!(b.state().current_anime.is_empty());
}

#[tokio::test]
async fn test_cached_reset_skips_network() {
    let catalog = ScriptedCatalog::with_replies(vec![Ok(page(&[1, 2], true))]);
    let mut b = browser(&catalog, None);

    b.load_anime(true).await;
    assert_eq!(catalog.calls().len(), 1);

    b.load_anime(true).await;
    assert_eq!(catalog.calls().len(), 1);
    assert_eq!(ids(&b), vec![1, 2]);
    assert!(b.state().has_next_page);
    assert_eq!(b.state().current_page, 1);
}

#[tokio::test]
async fn test_switching_filters_back_uses_filter_cache() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[1, 2], false)),
        Ok(page(&[7], false)),
    ]);
    let mut b = browser(&catalog, None);

    b.load_initial_data().await;
    b.set_sort(MediaSort::ScoreDesc).await;
    assert_eq!(ids(&b), vec![7]);

    b.set_sort(MediaSort::PopularityDesc).await;
    assert_eq!(ids(&b), vec![1, 2]);
    assert_eq!(catalog.calls().len(), 2);
}

#[tokio::test]
async fn test_load_more_appends_without_fallback() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[1, 2], true)),
        Ok(page(&[3], true)),
        Ok(page(&[], false)),
    ]);
    let mut b = browser(&catalog, Some(MediaSeason::Winter));

    b.load_initial_data().await;
    b.load_more_data().await;
    assert_eq!(ids(&b), vec![1, 2, 3]);
    assert_eq!(b.state().current_page, 2);

    // An empty page N+1 ends pagination; it never triggers fallback.
    b.load_more_data().await;
    assert_eq!(ids(&b), vec![1, 2, 3]);
    assert!(!b.state().has_next_page);
    assert_eq!(b.state().selected_season, Some(MediaSeason::Winter));

    let calls = catalog.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].page, Some(3));
    assert!(calls.iter().all(|c| c.season == Some(MediaSeason::Winter)));

    // No next page: nothing more is requested.
    b.load_more_data().await;
    assert_eq!(catalog.calls().len(), 3);
}

#[tokio::test]
async fn test_failed_load_more_keeps_data() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[1, 2], true)),
        Err(network_error()),
    ]);
    let mut b = browser(&catalog, None);

    b.load_initial_data().await;
    b.load_more_data().await;

    assert_eq!(ids(&b), vec![1, 2]);
    assert_eq!(b.state().error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(b.state().current_page, 1);
    assert!(!b.state().loading_more);
    assert!(!b.state().loading);
}

#[tokio::test]
async fn test_failed_reset_keeps_displayed_data() {
    let catalog = ScriptedCatalog::with_replies(vec![
        Ok(page(&[1, 2], false)),
        Err(network_error()),
    ]);
    let mut b = browser(&catalog, None);

    b.load_initial_data().await;
    b.set_search_query("frieren").await;

    assert_eq!(ids(&b), vec![1, 2]);
    assert_eq!(b.state().error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(catalog.calls()[1].search.as_deref(), Some("frieren"));
}

#[tokio::test]
async fn test_failed_first_load_shows_error() {
    let catalog = ScriptedCatalog::with_replies(vec![Err(ClientError::RateLimited {
        retry_after: Some(60),
    })]);
    let mut b = browser(&catalog, None);

    b.load_initial_data().await;

    assert!(b.state().current_anime.is_empty());
    assert_eq!(b.state().error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(!b.state().loading);
}

#[tokio::test]
async fn test_fallback_error_is_reported() {
    let catalog = ScriptedCatalog::with_replies(vec![Ok(page(&[], false)), Err(network_error())]);
    let mut b = browser(&catalog, Some(MediaSeason::Winter));

    b.load_anime(true).await;

    assert_eq!(b.state().error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(b.state().current_anime.is_empty());
    assert_eq!(catalog.calls().len(), 2);
}

#[tokio::test]
async fn test_results_are_safety_filtered() {
    let mut adult = Media::new(2, "Adult");
    adult.is_adult = true;
    let mut banned = Media::new(3, "Banned");
    banned.genres = vec!["Hentai".to_string()];

    let reply = Page {
        page_info: PageInfo::default(),
        media: vec![Media::new(1, "Safe"), adult, banned],
    };
    let catalog = ScriptedCatalog::with_replies(vec![Ok(reply)]);
    let mut b = browser(&catalog, None);

    b.load_anime(true).await;

    assert_eq!(ids(&b), vec![1]);
    assert_eq!(catalog.calls()[0].is_adult, Some(false));
}

#[tokio::test]
async fn test_clear_filters_resets_selection() {
    let catalog = ScriptedCatalog::with_replies(vec![Ok(page(&[4], false))]);
    let mut state = BrowseState::new(Some(MediaSeason::Summer), 50);
    state.search_query = "mecha".to_string();
    state.selected_sort = MediaSort::ScoreDesc;
    let mut b = Browser::new(catalog.clone(), state).with_reference_date(january());

    b.clear_filters().await;

    let state = b.state();
    assert_eq!(state.search_query, "");
    assert_eq!(state.selected_sort, MediaSort::PopularityDesc);
    assert_eq!(state.selected_season, None);
    assert_eq!(ids(&b), vec![4]);

    let calls = catalog.calls();
    assert_eq!(calls[0].search, None);
    assert_eq!(calls[0].season, None);
}

#[tokio::test]
async fn test_lookup_and_details() {
    let catalog = ScriptedCatalog::with_replies(vec![Ok(page(&[5, 6], false))]);
    let mut b = browser(&catalog, None);
    b.load_initial_data().await;

    assert_eq!(b.get_anime_by_id(6).map(|m| m.id), Some(6));
    assert!(b.get_anime_by_id(99).is_none());

    let details = b.load_anime_details(42).await.unwrap();
    assert_eq!(details.id, 42);
    assert_eq!(catalog.calls().len(), 1);
}

#[tokio::test]
async fn test_initial_load_skipped_when_data_shown() {
    let catalog = ScriptedCatalog::with_replies(vec![Ok(page(&[1], false))]);
    let mut b = browser(&catalog, None);

    b.load_initial_data().await;
    b.load_initial_data().await;

    assert_eq!(catalog.calls().len(), 1);
}
