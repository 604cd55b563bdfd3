//! Catalog rules that do not depend on I/O: calendar seasons and the content
//! safety filter.

pub mod safety;
pub mod season;

pub use safety::{filter_safe_anime, is_safe};
pub use season::{current_season, fallback_seasons, season_for_month, season_year};
