//! GraphQL documents sent to the catalog.
//!
//! Field lists are shared through `macro_rules!` so each document stays a
//! single `&'static str` usable as a cache-key prefix.

macro_rules! page_info_fields {
    () => {
        "pageInfo { total currentPage lastPage hasNextPage perPage }"
    };
}

macro_rules! card_fields {
    () => {
        r"
        id
        title { romaji english native }
        description(asHtml: false)
        startDate { year month day }
        season
        seasonYear
        format
        status
        episodes
        averageScore
        popularity
        isAdult
        coverImage { extraLarge large medium color }
        genres"
    };
}

pub const GET_ANIME_LIST: &str = concat!(
    r"
query GetAnimeList(
  $page: Int = 1
  $perPage: Int = 20
  $sort: [MediaSort] = [POPULARITY_DESC]
  $search: String
  $genre: String
  $season: MediaSeason
  $seasonYear: Int
  $format: MediaFormat
  $status: MediaStatus
  $isAdult: Boolean = false
) {
  Page(page: $page, perPage: $perPage) {
    ",
    page_info_fields!(),
    r"
    media(
      type: ANIME
      sort: $sort
      search: $search
      genre: $genre
      season: $season
      seasonYear: $seasonYear
      format: $format
      status: $status
      isAdult: $isAdult
    ) {",
    card_fields!(),
    r"
        duration
        meanScore
        favourites
        bannerImage
        studios(isMain: true) { nodes { id name } }
        source
    }
  }
}
"
);

pub const GET_ANIME_DETAILS: &str = concat!(
    r"
query GetAnimeDetails($id: Int!) {
  Media(id: $id, type: ANIME) {
    id
    title { romaji english native }
    description(asHtml: true)
    startDate { year month day }
    endDate { year month day }
    season
    seasonYear
    type
    format
    status
    episodes
    duration
    chapters
    volumes
    genres
    averageScore
    meanScore
    popularity
    favourites
    hashtag
    isAdult
    countryOfOrigin
    coverImage { extraLarge large medium color }
    bannerImage
    studios { nodes { id name } }
    source
  }
}
"
);

pub const SEARCH_ANIME: &str = concat!(
    r"
query SearchAnime($search: String!, $page: Int = 1, $perPage: Int = 20) {
  Page(page: $page, perPage: $perPage) {
    ",
    page_info_fields!(),
    r"
    media(type: ANIME, search: $search, sort: [SEARCH_MATCH, POPULARITY_DESC], isAdult: false) {",
    card_fields!(),
    r"
    }
  }
}
"
);

pub const GET_TRENDING_ANIME: &str = concat!(
    r"
query GetTrendingAnime($page: Int = 1, $perPage: Int = 20) {
  Page(page: $page, perPage: $perPage) {
    ",
    page_info_fields!(),
    r"
    media(type: ANIME, sort: [TRENDING_DESC, POPULARITY_DESC], isAdult: false) {",
    card_fields!(),
    r"
    }
  }
}
"
);

pub const GET_SEASONAL_ANIME: &str = concat!(
    r"
query GetSeasonalAnime($season: MediaSeason!, $seasonYear: Int!, $page: Int = 1, $perPage: Int = 20) {
  Page(page: $page, perPage: $perPage) {
    ",
    page_info_fields!(),
    r"
    media(type: ANIME, season: $season, seasonYear: $seasonYear, sort: [POPULARITY_DESC], isAdult: false) {",
    card_fields!(),
    r"
    }
  }
}
"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(doc: &str) -> bool {
        let mut depth = 0i32;
        for c in doc.chars() {
            match c {
                '{' | '(' => depth += 1,
                '}' | ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    #[test]
    fn test_documents_are_balanced() {
        for doc in [
            GET_ANIME_LIST,
            GET_ANIME_DETAILS,
            SEARCH_ANIME,
            GET_TRENDING_ANIME,
            GET_SEASONAL_ANIME,
        ] {
            assert!(balanced(doc), "unbalanced document: {doc}");
        }
    }

    #[test]
    fn test_list_documents_request_safety_fields() {
        for doc in [GET_ANIME_LIST, SEARCH_ANIME, GET_TRENDING_ANIME, GET_SEASONAL_ANIME] {
            assert!(doc.contains("pageInfo"));
            assert!(doc.contains("isAdult"));
            assert!(doc.contains("genres"));
        }
    }
}
