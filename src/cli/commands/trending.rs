use crate::clients::AnilistClient;
use crate::config::Config;
use crate::domain::filter_safe_anime;

use super::display::{print_header, print_media_list};

pub async fn cmd_trending(config: &Config, limit: u32) -> anyhow::Result<()> {
    let client = AnilistClient::from_config(config)?;
    let result = client.get_trending_anime(1, limit.clamp(1, 50)).await?;
    let media = filter_safe_anime(result.media);

    if media.is_empty() {
        println!("Nothing is trending right now.");
        return Ok(());
    }

    print_header("Trending Anime");
    print_media_list(&media);
    Ok(())
}
