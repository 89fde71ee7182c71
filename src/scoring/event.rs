use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::rules::ruleset::table_lookup;
use crate::rules::{FastestLapRule, Ruleset, SprintScoring};
use crate::season::{total_rounds, EventRecord, SessionKind};

/// Decimal places kept for per-event points.
pub const EVENT_PRECISION: i32 = 2;

/// An event record with the points it earns under a ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: EventRecord,
    pub base_points: f64,
    pub bonus_points: f64,
    pub total_points: f64,
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Avoid -0.0 leaking into output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Points for the finishing position of a race.
///
/// Applied in order: double points for the final round, half points for a
/// shortened race, then the shared-drive split. Sessions other than races and
/// unclassified finishers score 0.
pub fn base_points(record: &EventRecord, rules: &Ruleset, total_rounds: u32) -> f64 {
    if record.session != SessionKind::Race {
        return 0.0;
    }
    let Some(position) = record.classification.position() else {
        return 0.0;
    };

    let mut points = rules.points_for(position);
    if rules.double_points_final && record.round == total_rounds {
        points *= 2.0;
    }
    if rules.is_half_points_round(record.round) {
        points *= 0.5;
    }
    round_to(points * record.shared_factor, EVENT_PRECISION)
}

/// Sprint points, or the fastest-lap bonus of a race.
///
/// `fastest_lap_shares` maps each round to how many drivers set the race's
/// fastest lap (see [`fastest_lap_shares`]). Sprint finishers never earn the
/// fastest-lap bonus.
pub fn bonus_points(
    record: &EventRecord,
    rules: &Ruleset,
    fastest_lap_shares: &HashMap<u32, usize>,
) -> f64 {
    let position = record.classification.position();

    let bonus = match record.session {
        SessionKind::Sprint => match (&rules.sprint, position) {
            (SprintScoring::Table(table), Some(p)) => table_lookup(table, p),
            _ => 0.0,
        },
        SessionKind::Race if record.fastest_lap => match &rules.fastest_lap {
            FastestLapRule::None => 0.0,
            FastestLapRule::SharedPoint => {
                let sharing = fastest_lap_shares.get(&record.round).copied().unwrap_or(1);
                1.0 / sharing.max(1) as f64
            }
            FastestLapRule::TopFinisher {
                max_position,
                voided_rounds,
            } => match position {
                Some(p) if p <= *max_position && !voided_rounds.contains(&record.round) => 1.0,
                _ => 0.0,
            },
        },
        _ => 0.0,
    };
    round_to(bonus, EVENT_PRECISION)
}

/// Number of distinct drivers flagged with a race's fastest lap, by round.
pub fn fastest_lap_shares(records: &[EventRecord]) -> HashMap<u32, usize> {
    let setters: HashSet<(u32, &str)> = records
        .iter()
        .filter(|r| r.is_race() && r.fastest_lap)
        .map(|r| (r.round, r.driver.as_str()))
        .collect();

    let mut shares = HashMap::new();
    for (round, _) in setters {
        *shares.entry(round).or_insert(0) += 1;
    }
    shares
}

/// Score one record given season-wide context.
pub fn score_record(
    record: &EventRecord,
    rules: &Ruleset,
    total_rounds: u32,
    fastest_lap_shares: &HashMap<u32, usize>,
) -> ScoredRecord {
    let base = base_points(record, rules, total_rounds);
    let bonus = bonus_points(record, rules, fastest_lap_shares);
    ScoredRecord {
        record: record.clone(),
        base_points: base,
        bonus_points: bonus,
        total_points: round_to(base + bonus, EVENT_PRECISION),
    }
}

/// Score every record of a season, in input order.
pub fn score_season(records: &[EventRecord], rules: &Ruleset) -> Vec<ScoredRecord> {
    let total = total_rounds(records);
    let shares = fastest_lap_shares(records);
    records
        .iter()
        .map(|record| score_record(record, rules, total, &shares))
        .collect()
}
