use crate::models::Media;

/// Genres that exclude a record regardless of its adult flag.
pub const BANNED_GENRES: &[&str] = &["adult", "hentai"];

#[must_use]
pub fn is_safe(media: &Media) -> bool {
    if media.is_adult {
        return false;
    }

    !media
        .genres
        .iter()
        .any(|g| BANNED_GENRES.contains(&g.to_lowercase().as_str()))
}

/// Drops adult records and records tagged with a banned genre.
#[must_use]
pub fn filter_safe_anime(list: Vec<Media>) -> Vec<Media> {
    list.into_iter().filter(is_safe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: i32, adult: bool, genres: &[&str]) -> Media {
        let mut m = Media::new(id, format!("Show {id}"));
        m.is_adult = adult;
        m.genres = genres.iter().map(|g| (*g).to_string()).collect();
        m
    }

    fn sample() -> Vec<Media> {
        vec![
            media(1, false, &["Action", "Drama"]),
            media(2, true, &["Romance"]),
            media(3, false, &["HENTAI"]),
            media(4, false, &["Comedy", "Adult"]),
            media(5, false, &[]),
            media(6, false, &["Adult Cast"]),
        ]
    }

    #[test]
    fn test_filter_removes_adult_and_banned_genres() {
        let ids: Vec<i32> = filter_safe_anime(sample()).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 5, 6]);
    }

    #[test]
    fn test_no_unsafe_item_survives() {
        for m in filter_safe_anime(sample()) {
            assert!(!m.is_adult);
            for g in &m.genres {
                let lower = g.to_lowercase();
                assert!(!BANNED_GENRES.contains(&lower.as_str()));
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_safe_anime(sample());
        let twice = filter_safe_anime(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_safe_anime(Vec::new()).is_empty());
    }
}
