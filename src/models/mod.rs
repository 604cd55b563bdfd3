pub mod format;
pub mod media;
pub mod params;

pub use media::{
    FuzzyDate, Media, MediaCoverImage, MediaFormat, MediaSeason, MediaSort, MediaSource,
    MediaStatus, MediaTitle, MediaType, Page, PageInfo, Studio, StudioConnection,
};
pub use params::AnimeListParams;
