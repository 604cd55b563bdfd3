//! Calendar season arithmetic.
//!
//! AniList files shows under a broadcast season and a season year. December
//! belongs to the WINTER season of the year it falls in, so a viewer in
//! January and one in December both see WINTER as "now".

use chrono::{Datelike, NaiveDate};

use crate::models::MediaSeason;

#[must_use]
pub const fn season_for_month(month: u32) -> MediaSeason {
    match month {
        3..=5 => MediaSeason::Spring,
        6..=8 => MediaSeason::Summer,
        9..=11 => MediaSeason::Fall,
        _ => MediaSeason::Winter,
    }
}

/// Season and calendar year for `date`.
#[must_use]
pub fn current_season(date: NaiveDate) -> (MediaSeason, i32) {
    (season_for_month(date.month()), date.year())
}

/// Season year to query when `selected` is requested while the calendar is
/// in `current` of `year`.
///
/// Picking WINTER during FALL means the upcoming winter; picking SUMMER or
/// FALL during WINTER means the ones that just passed.
#[must_use]
pub const fn season_year(selected: MediaSeason, current: MediaSeason, year: i32) -> i32 {
    match (current, selected) {
        (MediaSeason::Fall, MediaSeason::Winter) => year + 1,
        (MediaSeason::Winter, MediaSeason::Summer | MediaSeason::Fall) => year - 1,
        _ => year,
    }
}

/// The two seasons tried, in order, when a seasonal query comes back empty.
#[must_use]
pub const fn fallback_seasons(season: MediaSeason) -> [MediaSeason; 2] {
    match season {
        MediaSeason::Winter => [MediaSeason::Fall, MediaSeason::Summer],
        MediaSeason::Spring => [MediaSeason::Winter, MediaSeason::Fall],
        MediaSeason::Summer => [MediaSeason::Spring, MediaSeason::Winter],
        MediaSeason::Fall => [MediaSeason::Summer, MediaSeason::Spring],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MediaSeason::{Fall, Spring, Summer, Winter};

    #[test]
    fn test_season_for_every_month() {
        let expected = [
            Winter, Winter, Spring, Spring, Spring, Summer, Summer, Summer, Fall, Fall, Fall,
            Winter,
        ];
        for (i, season) in expected.iter().enumerate() {
            let month = u32::try_from(i).unwrap() + 1;
            assert_eq!(season_for_month(month), *season, "month {month}");
        }
    }

    #[test]
    fn test_current_season_keeps_calendar_year() {
        let dec = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(current_season(dec), (Winter, 2025));

        let oct = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(current_season(oct), (Fall, 2026));
    }

    #[test]
    fn test_season_year_table() {
        let year = 2025;
        // (current, selected, expected)
        let table = [
            (Winter, Winter, year),
            (Winter, Spring, year),
            (Winter, Summer, year - 1),
            (Winter, Fall, year - 1),
            (Spring, Winter, year),
            (Spring, Spring, year),
            (Spring, Summer, year),
            (Spring, Fall, year),
            (Summer, Winter, year),
            (Summer, Spring, year),
            (Summer, Summer, year),
            (Summer, Fall, year),
            (Fall, Winter, year + 1),
            (Fall, Spring, year),
            (Fall, Summer, year),
            (Fall, Fall, year),
        ];

        for (current, selected, expected) in table {
            assert_eq!(
                season_year(selected, current, year),
                expected,
                "selecting {selected} during {current}"
            );
        }
    }

    #[test]
    fn test_fallback_order() {
        assert_eq!(fallback_seasons(Winter), [Fall, Summer]);
        assert_eq!(fallback_seasons(Spring), [Winter, Fall]);
        assert_eq!(fallback_seasons(Summer), [Spring, Winter]);
        assert_eq!(fallback_seasons(Fall), [Summer, Spring]);
    }
}
