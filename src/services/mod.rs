pub mod browse;
pub use browse::{BrowseState, Browser, FilterCacheEntry, LOAD_ERROR_MESSAGE};

pub mod catalog;
pub use catalog::MediaCatalog;

pub mod fallback;
pub use fallback::{FallbackResult, try_no_season_fallback, try_seasonal_fallbacks};
