//! Historical rule tables.
//!
//! Year-keyed tables hold the value effective *from* that year until the next
//! key; look them up with [`resolve`](super::resolve). Season-keyed tables
//! list one-off exceptions and are matched exactly with [`season_rounds`].

use super::ruleset::DropPolicy;

/// Points per finishing position, indexed from P1.
pub const BASE_POINTS: &[(u16, &[f64])] = &[
    (1950, &[8.0, 6.0, 4.0, 3.0, 2.0]),
    (1960, &[8.0, 6.0, 4.0, 3.0, 2.0, 1.0]),
    (1961, &[9.0, 6.0, 4.0, 3.0, 2.0, 1.0]),
    (1991, &[10.0, 6.0, 4.0, 3.0, 2.0, 1.0]),
    (2003, &[10.0, 8.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]),
    (2010, &[25.0, 18.0, 15.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0, 1.0]),
];

/// Which results count towards the championship.
pub const DROP_POLICIES: &[(u16, DropPolicy)] = &[
    (1950, DropPolicy::BestOf(4)),
    (1954, DropPolicy::BestOf(5)),
    (1958, DropPolicy::BestOf(6)),
    (1959, DropPolicy::BestOf(5)),
    (1960, DropPolicy::BestOf(6)),
    (1961, DropPolicy::BestOf(5)),
    (1963, DropPolicy::BestOf(6)),
    (1966, DropPolicy::BestOf(5)),
    (1967, DropPolicy::Split { first: 5, second: 4 }),
    (1968, DropPolicy::Split { first: 5, second: 5 }),
    (1969, DropPolicy::Split { first: 5, second: 4 }),
    (1970, DropPolicy::Split { first: 6, second: 5 }),
    (1971, DropPolicy::Split { first: 5, second: 4 }),
    (1972, DropPolicy::Split { first: 5, second: 5 }),
    (1973, DropPolicy::Split { first: 7, second: 6 }),
    (1975, DropPolicy::Split { first: 6, second: 6 }),
    (1976, DropPolicy::Split { first: 7, second: 7 }),
    (1977, DropPolicy::Split { first: 8, second: 7 }),
    (1979, DropPolicy::Split { first: 4, second: 4 }),
    (1980, DropPolicy::Split { first: 5, second: 5 }),
    (1981, DropPolicy::BestOf(11)),
    (1991, DropPolicy::CountAll),
];

/// Sprint points by rule year. Rule years before the first key award nothing.
pub const SPRINT_POINTS: &[(u16, &[f64])] = &[
    (2021, &[3.0, 2.0, 1.0]),
    (2022, &[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]),
];

/// Rule year in which the final round paid double.
pub const DOUBLE_POINTS_FINAL_YEAR: u16 = 2014;

/// Rule years in which a fastest lap earned a point split between everyone
/// who set it.
pub const SHARED_FASTEST_LAP_YEARS: (u16, u16) = (1950, 1959);

/// Rule years in which a fastest lap earned a point for a top-ten finisher.
pub const TOP_TEN_FASTEST_LAP_YEARS: (u16, u16) = (2019, 2024);

/// Classified position a fastest-lap setter must reach in the top-ten era.
pub const FASTEST_LAP_MAX_POSITION: u32 = 10;

/// Races stopped short, paying half points. Keyed by season.
pub const HALF_POINTS_ROUNDS: &[(u16, &[u32])] = &[
    (1975, &[4, 12]),
    (1984, &[6]),
    (1991, &[16]),
    (2009, &[2]),
    (2021, &[12]),
];

/// Races where the fastest-lap point is never paid. Keyed by season.
///
/// Spa 2021 ran two laps behind the safety car. This is a literal list; other
/// abandoned races are not inferred from it.
pub const VOIDED_FASTEST_LAP_ROUNDS: &[(u16, &[u32])] = &[(2021, &[12])];

/// Exact-match lookup of a season's exception rounds.
pub fn season_rounds(table: &[(u16, &[u32])], season: u16) -> Vec<u32> {
    table
        .iter()
        .find(|(year, _)| *year == season)
        .map(|(_, rounds)| rounds.to_vec())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_rounds_exact_match_only() {
        assert_eq!(season_rounds(HALF_POINTS_ROUNDS, 1975), vec![4, 12]);
        assert_eq!(season_rounds(HALF_POINTS_ROUNDS, 2021), vec![12]);
        assert!(season_rounds(HALF_POINTS_ROUNDS, 1976).is_empty());
        assert!(season_rounds(HALF_POINTS_ROUNDS, 2022).is_empty());
    }

    #[test]
    fn test_voided_fastest_lap_is_single_entry() {
        assert_eq!(season_rounds(VOIDED_FASTEST_LAP_ROUNDS, 2021), vec![12]);
        assert!(season_rounds(VOIDED_FASTEST_LAP_ROUNDS, 2009).is_empty());
    }

    #[test]
    fn test_tables_keyed_ascending() {
        fn ascending<T>(table: &[(u16, T)]) -> bool {
            table.windows(2).all(|w| w[0].0 < w[1].0)
        }
        assert!(ascending(BASE_POINTS));
        assert!(ascending(DROP_POLICIES));
        assert!(ascending(SPRINT_POINTS));
    }

    #[test]
    fn test_points_tables_descending() {
        for (year, points) in BASE_POINTS.iter().chain(SPRINT_POINTS) {
            assert!(
                points.windows(2).all(|w| w[0] > w[1]),
                "table for {} is not strictly descending",
                year
            );
        }
    }
}
