use serde::{Deserialize, Serialize};

use super::media::{MediaFormat, MediaSeason, MediaSort, MediaStatus};

/// Variables for the list query. Absent fields are omitted from the request
/// so the document's own defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<MediaSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<MediaSeason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MediaFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_adult: Option<bool>,
}

impl AnimeListParams {
    #[must_use]
    pub fn builder() -> AnimeListParamsBuilder {
        AnimeListParamsBuilder::default()
    }

    /// Same parameters with the season filter removed.
    #[must_use]
    pub fn without_season(&self) -> Self {
        Self {
            season: None,
            season_year: None,
            ..self.clone()
        }
    }

    /// Same parameters pinned to another season.
    #[must_use]
    pub fn with_season(&self, season: MediaSeason, year: i32) -> Self {
        Self {
            season: Some(season),
            season_year: Some(year),
            ..self.clone()
        }
    }

    pub fn to_variables(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimeListParamsBuilder {
    params: AnimeListParams,
}

impl AnimeListParamsBuilder {
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.params.page = Some(page.max(1));
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.params.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.params.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.params.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn season(mut self, season: MediaSeason, year: i32) -> Self {
        self.params.season = Some(season);
        self.params.season_year = Some(year);
        self
    }

    #[must_use]
    pub fn format(mut self, format: MediaFormat) -> Self {
        self.params.format = Some(format);
        self
    }

    #[must_use]
    pub fn status(mut self, status: MediaStatus) -> Self {
        self.params.status = Some(status);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: Vec<MediaSort>) -> Self {
        self.params.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn adult_content(mut self, is_adult: bool) -> Self {
        self.params.is_adult = Some(is_adult);
        self
    }

    #[must_use]
    pub fn build(self) -> AnimeListParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variables_omit_absent_fields() {
        let params = AnimeListParams::builder()
            .page(2)
            .per_page(50)
            .sort(vec![MediaSort::PopularityDesc])
            .season(MediaSeason::Winter, 2025)
            .adult_content(false)
            .build();

        assert_eq!(
            params.to_variables(),
            json!({
                "page": 2,
                "perPage": 50,
                "sort": ["POPULARITY_DESC"],
                "season": "WINTER",
                "seasonYear": 2025,
                "isAdult": false
            })
        );
    }

    #[test]
    fn test_page_is_at_least_one() {
        let params = AnimeListParams::builder().page(0).build();
        assert_eq!(params.page, Some(1));
    }

    #[test]
    fn test_season_overrides() {
        let params = AnimeListParams::builder()
            .search("frieren")
            .season(MediaSeason::Fall, 2023)
            .build();

        let spring = params.with_season(MediaSeason::Spring, 2024);
        assert_eq!(spring.season, Some(MediaSeason::Spring));
        assert_eq!(spring.season_year, Some(2024));
        assert_eq!(spring.search.as_deref(), Some("frieren"));

        let none = params.without_season();
        assert_eq!(none.season, None);
        assert_eq!(none.season_year, None);
        assert!(none.to_variables().get("season").is_none());
    }
}
