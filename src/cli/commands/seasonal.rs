use anyhow::Context;
use chrono::Local;

use crate::clients::AnilistClient;
use crate::config::Config;
use crate::domain::{current_season, filter_safe_anime, season_year};
use crate::models::MediaSeason;

use super::display::{print_header, print_media_list};

pub async fn cmd_seasonal(
    config: &Config,
    season: Option<&str>,
    year: Option<i32>,
) -> anyhow::Result<()> {
    let (current, this_year) = current_season(Local::now().date_naive());

    let season = match season {
        Some(s) => s.parse::<MediaSeason>().context("Invalid season")?,
        None => current,
    };
    let year = year.unwrap_or_else(|| season_year(season, current, this_year));

    let client = AnilistClient::from_config(config)?;
    let result = client.get_seasonal_anime(season, year, 1, 50).await?;
    let total = result.total();
    let media = filter_safe_anime(result.media);

    if media.is_empty() {
        println!("No anime found for {season} {year}");
        return Ok(());
    }

    print_header(&format!("{season} {year} ({total} titles)"));
    print_media_list(&media);
    Ok(())
}
