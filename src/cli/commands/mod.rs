mod browse;
mod display;
mod info;
mod search;
mod seasonal;
mod serve;
mod trending;

pub use browse::{BrowseOptions, cmd_browse};
pub use info::cmd_anime_info;
pub use search::cmd_search_anime;
pub use seasonal::cmd_seasonal;
pub use serve::cmd_serve;
pub use trending::cmd_trending;
