use crate::clients::AnilistClient;
use crate::config::Config;
use crate::domain::filter_safe_anime;

use super::display::{print_header, print_media_list};

pub async fn cmd_search_anime(config: &Config, query: &str, page: u32) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        println!("Search query cannot be empty");
        return Ok(());
    }

    println!("Searching for: {query}");

    let client = AnilistClient::from_config(config)?;
    let result = client.search_anime(query, page.max(1), 20).await?;
    let has_next = result.has_next_page();
    let total = result.total();
    let media = filter_safe_anime(result.media);

    if media.is_empty() {
        println!("No anime found matching '{query}'");
        return Ok(());
    }

    print_header(&format!("Search Results ({total} total, page {})", page.max(1)));
    print_media_list(&media);

    if has_next {
        println!();
        println!("More results: anichart search \"{query}\" --page {}", page.max(1) + 1);
    }

    Ok(())
}
