use crate::clients::AnilistClient;
use crate::config::Config;
use crate::domain::is_safe;
use crate::models::format::{
    display_title, format_media_format, format_score, format_status, format_year,
    plain_description,
};

pub async fn cmd_anime_info(config: &Config, id: i32) -> anyhow::Result<()> {
    if id <= 0 {
        println!("Invalid anime ID: {id}");
        return Ok(());
    }

    let client = AnilistClient::from_config(config)?;
    let anime = client.get_anime_details(id).await?;

    if !is_safe(&anime) {
        println!("Anime with ID {id} not found.");
        return Ok(());
    }

    println!("Anime Info");
    println!("{:-<60}", "");
    println!("Title:    {}", display_title(&anime.title));
    if let Some(romaji) = &anime.title.romaji {
        println!("Romaji:   {romaji}");
    }
    if let Some(native) = &anime.title.native {
        println!("Native:   {native}");
    }
    println!("ID:       {}", anime.id);
    println!("Format:   {}", format_media_format(anime.format));
    println!(
        "Episodes: {}",
        anime
            .episodes
            .map_or_else(|| "?".to_string(), |e| e.to_string())
    );
    println!("Status:   {}", format_status(anime.status));
    println!("Year:     {}", format_year(anime.start_date.as_ref()));
    if let (Some(season), Some(year)) = (anime.season, anime.season_year) {
        println!("Season:   {season} {year}");
    }
    println!("Score:    {}", format_score(anime.average_score));

    let studios = anime.studio_names();
    if !studios.is_empty() {
        println!("Studios:  {}", studios.join(", "));
    }
    if !anime.genres.is_empty() {
        println!("Genres:   {}", anime.genres.join(", "));
    }

    if let Some(description) = anime.description.as_deref().filter(|d| !d.is_empty()) {
        println!();
        println!("{}", plain_description(description, 78));
    }

    println!();
    Ok(())
}
