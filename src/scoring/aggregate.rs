use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::event::{round_to, ScoredRecord};
use crate::rules::DropPolicy;
use crate::season::EventRecord;

/// Decimal places kept for championship totals.
pub const STANDINGS_PRECISION: i32 = 1;

/// A driver's championship total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub driver: String,
    pub points: f64,
}

/// Championship standings from scored records under a drop policy.
///
/// Sorted by points descending. Drivers level on points stay in name order.
pub fn aggregate(scored: &[ScoredRecord], policy: DropPolicy, total_rounds: u32) -> Vec<StandingsRow> {
    tally(
        scored
            .iter()
            .map(|s| (s.record.driver.as_str(), s.record.round, s.total_points)),
        policy,
        total_rounds,
    )
}

/// Championship standings from the points awarded at the time.
///
/// Pass the season's own drop policy to reproduce the record books.
pub fn official_standings(
    records: &[EventRecord],
    policy: DropPolicy,
    total_rounds: u32,
) -> Vec<StandingsRow> {
    tally(
        records
            .iter()
            .map(|r| (r.driver.as_str(), r.round, r.official_points)),
        policy,
        total_rounds,
    )
}

/// Group `(driver, round, points)` entries by driver and total them.
pub(crate) fn tally<'a, I>(entries: I, policy: DropPolicy, total_rounds: u32) -> Vec<StandingsRow>
where
    I: IntoIterator<Item = (&'a str, u32, f64)>,
{
    let mut by_driver: BTreeMap<&str, Vec<(u32, f64)>> = BTreeMap::new();
    for (driver, round, points) in entries {
        by_driver.entry(driver).or_default().push((round, points));
    }

    let mut rows: Vec<StandingsRow> = by_driver
        .into_iter()
        .map(|(driver, results)| StandingsRow {
            driver: driver.to_string(),
            points: round_to(
                counted_points(&results, policy, total_rounds),
                STANDINGS_PRECISION,
            ),
        })
        .collect();

    // sort_by is stable: ties keep name order
    rows.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(Ordering::Equal));
    rows
}

/// Points that count for one driver's `(round, points)` results.
///
/// Best-of selection picks by value, not by when the result happened. A split
/// policy divides the season after round `total_rounds / 2`.
pub fn counted_points(results: &[(u32, f64)], policy: DropPolicy, total_rounds: u32) -> f64 {
    match policy {
        DropPolicy::CountAll => results.iter().map(|(_, p)| p).sum(),
        DropPolicy::BestOf(n) => best_of(results.iter().map(|(_, p)| *p), n),
        DropPolicy::Split { first, second } => {
            let midpoint = total_rounds / 2;
            let first_half = results.iter().filter(|(r, _)| *r <= midpoint).map(|(_, p)| *p);
            let second_half = results.iter().filter(|(r, _)| *r > midpoint).map(|(_, p)| *p);
            best_of(first_half, first) + best_of(second_half, second)
        }
    }
}

fn best_of(points: impl Iterator<Item = f64>, n: usize) -> f64 {
    let mut points: Vec<f64> = points.collect();
    points.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    points.into_iter().take(n).sum()
}
