use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::aggregate::{tally, StandingsRow};
use super::event::score_season;
use crate::error::ScoringError;
use crate::rules::{resolve, tables::DROP_POLICIES, Ruleset};
use crate::season::{rounds, total_rounds, EventRecord};

/// A driver's championship total after a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub driver: String,
    pub round: u32,
    pub points: f64,
}

/// Round-by-round championship totals under official and simulated scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub official: Vec<ProgressionPoint>,
    pub simulated: Vec<ProgressionPoint>,
}

impl Progression {
    pub fn is_empty(&self) -> bool {
        self.official.is_empty() && self.simulated.is_empty()
    }

    /// Drivers with points at some stage under either scoring, by name.
    pub fn scoring_drivers(&self) -> Vec<String> {
        self.official
            .iter()
            .chain(&self.simulated)
            .filter(|p| p.points > 0.0)
            .map(|p| p.driver.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rounds covered, ascending.
    pub fn rounds(&self) -> Vec<u32> {
        self.official
            .iter()
            .chain(&self.simulated)
            .map(|p| p.round)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Standings after every round of the season.
///
/// Each round's standings are recomputed from scratch over the results up to
/// that round: a best-of policy can swap which earlier results count once a
/// new one arrives, so totals cannot be carried forward. Records are scored
/// once with the whole season as context, and the split point of a split
/// policy stays at the middle of the full season.
///
/// Official totals use the drop policy of `rules.season` itself.
pub fn progression(records: &[EventRecord], rules: &Ruleset) -> Result<Progression, ScoringError> {
    if records.is_empty() {
        return Ok(Progression::default());
    }

    let official_policy = *resolve(rules.season, DROP_POLICIES)?;
    let total = total_rounds(records);
    let scored = score_season(records, rules);

    let mut result = Progression::default();
    for round in rounds(records) {
        let simulated = tally(
            scored
                .iter()
                .filter(|s| s.record.round <= round)
                .map(|s| (s.record.driver.as_str(), s.record.round, s.total_points)),
            rules.drop_policy,
            total,
        );
        let official = tally(
            records
                .iter()
                .filter(|r| r.round <= round)
                .map(|r| (r.driver.as_str(), r.round, r.official_points)),
            official_policy,
            total,
        );

        result.simulated.extend(points_at(round, simulated));
        result.official.extend(points_at(round, official));
    }

    log::debug!(
        "Progression for {} over {} rounds: {} simulated points, {} official points",
        rules.season,
        total,
        result.simulated.len(),
        result.official.len()
    );
    Ok(result)
}

fn points_at(round: u32, standings: Vec<StandingsRow>) -> impl Iterator<Item = ProgressionPoint> {
    standings.into_iter().map(move |row| ProgressionPoint {
        driver: row.driver,
        round,
        points: row.points,
    })
}
