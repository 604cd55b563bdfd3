use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares an AniList enumeration whose wire names are SCREAMING_SNAKE_CASE.
macro_rules! graphql_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_uppercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

graphql_enum!(
    MediaType {
        Anime => "ANIME",
        Manga => "MANGA",
    }
);

graphql_enum!(
    MediaFormat {
        Tv => "TV",
        TvShort => "TV_SHORT",
        Movie => "MOVIE",
        Special => "SPECIAL",
        Ova => "OVA",
        Ona => "ONA",
        Music => "MUSIC",
        Manga => "MANGA",
        Novel => "NOVEL",
        OneShot => "ONE_SHOT",
    }
);

graphql_enum!(
    MediaStatus {
        Finished => "FINISHED",
        Releasing => "RELEASING",
        NotYetReleased => "NOT_YET_RELEASED",
        Cancelled => "CANCELLED",
        Hiatus => "HIATUS",
    }
);

graphql_enum!(
    /// Broadcast season. Ordered by calendar position within a year.
    MediaSeason {
        Winter => "WINTER",
        Spring => "SPRING",
        Summer => "SUMMER",
        Fall => "FALL",
    }
);

graphql_enum!(
    MediaSource {
        Original => "ORIGINAL",
        Manga => "MANGA",
        LightNovel => "LIGHT_NOVEL",
        VisualNovel => "VISUAL_NOVEL",
        VideoGame => "VIDEO_GAME",
        Other => "OTHER",
        Novel => "NOVEL",
        Doujinshi => "DOUJINSHI",
        Anime => "ANIME",
        WebNovel => "WEB_NOVEL",
        LiveAction => "LIVE_ACTION",
        Game => "GAME",
        Comic => "COMIC",
        MultimediaProject => "MULTIMEDIA_PROJECT",
        PictureBook => "PICTURE_BOOK",
    }
);

graphql_enum!(
    MediaSort {
        Id => "ID",
        IdDesc => "ID_DESC",
        TitleRomaji => "TITLE_ROMAJI",
        TitleRomajiDesc => "TITLE_ROMAJI_DESC",
        TitleEnglish => "TITLE_ENGLISH",
        TitleEnglishDesc => "TITLE_ENGLISH_DESC",
        TitleNative => "TITLE_NATIVE",
        TitleNativeDesc => "TITLE_NATIVE_DESC",
        Type => "TYPE",
        TypeDesc => "TYPE_DESC",
        Format => "FORMAT",
        FormatDesc => "FORMAT_DESC",
        StartDate => "START_DATE",
        StartDateDesc => "START_DATE_DESC",
        EndDate => "END_DATE",
        EndDateDesc => "END_DATE_DESC",
        Score => "SCORE",
        ScoreDesc => "SCORE_DESC",
        Popularity => "POPULARITY",
        PopularityDesc => "POPULARITY_DESC",
        Trending => "TRENDING",
        TrendingDesc => "TRENDING_DESC",
        Episodes => "EPISODES",
        EpisodesDesc => "EPISODES_DESC",
        Duration => "DURATION",
        DurationDesc => "DURATION_DESC",
        Status => "STATUS",
        StatusDesc => "STATUS_DESC",
        Chapters => "CHAPTERS",
        ChaptersDesc => "CHAPTERS_DESC",
        Volumes => "VOLUMES",
        VolumesDesc => "VOLUMES_DESC",
        UpdatedAt => "UPDATED_AT",
        UpdatedAtDesc => "UPDATED_AT_DESC",
        SearchMatch => "SEARCH_MATCH",
        Favourites => "FAVOURITES",
        FavouritesDesc => "FAVOURITES_DESC",
    }
);

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes an enumeration leniently: values added upstream after this build
/// become `None` instead of failing the whole response.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaCoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

/// A date where any component may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConnection {
    pub nodes: Vec<Studio>,
}

/// A single catalog entry as returned by the list and detail queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub title: MediaTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub end_date: Option<FuzzyDate>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub season: Option<MediaSeason>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default, rename = "type", deserialize_with = "lenient_enum")]
    pub media_type: Option<MediaType>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub format: Option<MediaFormat>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: Option<MediaStatus>,
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub chapters: Option<i32>,
    #[serde(default)]
    pub volumes: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub average_score: Option<i32>,
    #[serde(default)]
    pub mean_score: Option<i32>,
    #[serde(default)]
    pub popularity: Option<i32>,
    #[serde(default)]
    pub favourites: Option<i32>,
    #[serde(default)]
    pub hashtag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_image: MediaCoverImage,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub studios: Option<StudioConnection>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub source: Option<MediaSource>,
}

impl Media {
    /// Builds a record carrying only an id and a romaji title.
    #[must_use]
    pub fn new(id: i32, romaji: impl Into<String>) -> Self {
        Self {
            id,
            title: MediaTitle {
                romaji: Some(romaji.into()),
                english: None,
                native: None,
            },
            description: None,
            start_date: None,
            end_date: None,
            season: None,
            season_year: None,
            media_type: Some(MediaType::Anime),
            format: None,
            status: None,
            episodes: None,
            duration: None,
            chapters: None,
            volumes: None,
            genres: Vec::new(),
            average_score: None,
            mean_score: None,
            popularity: None,
            favourites: None,
            hashtag: None,
            is_adult: false,
            country_of_origin: None,
            cover_image: MediaCoverImage::default(),
            banner_image: None,
            studios: None,
            source: None,
        }
    }

    #[must_use]
    pub fn studio_names(&self) -> Vec<&str> {
        self.studios
            .as_ref()
            .map(|s| s.nodes.iter().map(|n| n.name.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub total: Option<u32>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub has_next_page: Option<bool>,
    pub per_page: Option<u32>,
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
    pub media: Vec<Media>,
}

impl Page {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.page_info.total.unwrap_or(0)
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page.unwrap_or(false)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}
