use anyhow::Context;
use chrono::Local;
use std::sync::Arc;

use crate::clients::AnilistClient;
use crate::config::Config;
use crate::models::{MediaSeason, MediaSort};
use crate::services::{BrowseState, Browser};

use super::display::{print_header, print_media_list};

pub struct BrowseOptions<'a> {
    pub search: Option<&'a str>,
    pub sort: Option<&'a str>,
    pub season: Option<&'a str>,
    pub all_seasons: bool,
    pub pages: u32,
}

pub async fn cmd_browse(config: &Config, options: BrowseOptions<'_>) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let mut state = BrowseState::for_date(today, config.browse.items_per_page);

    if let Some(search) = options.search {
        state.search_query = search.to_string();
    }
    if let Some(sort) = options.sort {
        state.selected_sort = sort.parse::<MediaSort>().context("Invalid sort")?;
    }
    if let Some(season) = options.season {
        state.selected_season = Some(season.parse::<MediaSeason>().context("Invalid season")?);
    }
    if options.all_seasons {
        state.selected_season = None;
    }

    let requested_season = state.selected_season;
    let client = Arc::new(AnilistClient::from_config(config)?);
    let mut browser = Browser::new(client, state);

    browser.load_initial_data().await;
    for _ in 1..options.pages.max(1) {
        if !browser.state().has_next_page || browser.state().error.is_some() {
            break;
        }
        browser.load_more_data().await;
    }

    let state = browser.state();

    if let Some(error) = &state.error {
        println!("{error}");
        if state.current_anime.is_empty() {
            return Ok(());
        }
    }

    if state.current_anime.is_empty() {
        println!("No anime found.");
        return Ok(());
    }

    if state.selected_season != requested_season {
        match state.selected_season {
            Some(season) => println!("No results for the selected season, showing {season} instead."),
            None => println!("No results for the selected season, showing all seasons instead."),
        }
    }

    let heading = state.selected_season.map_or_else(
        || format!("Browse: {} (all seasons)", state.selected_sort),
        |season| format!("Browse: {} ({season})", state.selected_sort),
    );
    print_header(&heading);
    print_media_list(&state.current_anime);

    println!();
    println!(
        "Showing {} of {} | page {}{}",
        state.current_anime.len(),
        state.total_available,
        state.current_page,
        if state.has_next_page { " | more available" } else { "" }
    );

    Ok(())
}
