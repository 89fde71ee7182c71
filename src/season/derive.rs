//! Values derived from a whole race rather than a single row.

use std::collections::{HashMap, HashSet};

use super::record::EventRecord;
use crate::rules::ruleset::table_lookup;
use crate::rules::{resolve, tables::BASE_POINTS};

/// Last season whose timing data lacks fastest-lap flags and where they are
/// recovered from the points awarded.
pub const VINTAGE_FASTEST_LAP_LAST_SEASON: u16 = 1959;

/// Points above the position's share that mark a fastest-lap bonus.
const FASTEST_LAP_TOLERANCE: f64 = 0.1;

/// Set each race participant's shared-drive factor.
///
/// Participants of one race classified in the same position split it evenly:
/// each gets `1 / k` where `k` is the number sharing it. Everyone else, and
/// every non-race row, gets 1.0.
pub fn with_shared_factors(records: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut sharing: HashMap<(u32, u32), usize> = HashMap::new();
    for record in records.iter().filter(|r| r.is_race()) {
        if let Some(position) = record.classification.position() {
            *sharing.entry((record.round, position)).or_default() += 1;
        }
    }

    records
        .into_iter()
        .map(|record| {
            let count = match record.classification.position() {
                Some(position) if record.is_race() => {
                    sharing.get(&(record.round, position)).copied().unwrap_or(1)
                }
                _ => 1,
            };
            EventRecord {
                shared_factor: 1.0 / count as f64,
                ..record
            }
        })
        .collect()
}

/// Fill in fastest-lap flags the source data left out.
///
/// `flags[i]` is the raw flag of `records[i]`; `None` means the source had no
/// value. Missing flags stay false except for race rows of vintage seasons,
/// where a driver whose official points exceed their share of the position's
/// points is taken to have set the fastest lap. A driver flagged on any row of
/// a race is flagged on all their rows of that race.
///
/// Expects shared factors to be set already.
pub fn with_inferred_fastest_laps(
    records: Vec<EventRecord>,
    flags: &[Option<bool>],
    season: u16,
) -> Vec<EventRecord> {
    let base_points = if season <= VINTAGE_FASTEST_LAP_LAST_SEASON {
        match resolve(season, BASE_POINTS) {
            Ok(points) => Some(*points),
            Err(e) => {
                log::warn!("Cannot infer fastest laps for {}: {}", season, e);
                None
            }
        }
    } else {
        None
    };

    let explicit = |i: usize| flags.get(i).copied().flatten();

    let detected: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(i, record)| match (explicit(i), base_points) {
            (Some(flag), _) => flag,
            (None, Some(points)) if record.is_race() => exceeds_position_share(record, points),
            (None, _) => false,
        })
        .collect();

    let flagged: HashSet<(u32, String)> = records
        .iter()
        .zip(&detected)
        .filter(|(record, hit)| **hit && record.is_race())
        .map(|(record, _)| (record.round, record.driver.clone()))
        .collect();

    records
        .into_iter()
        .zip(detected)
        .map(|(record, hit)| {
            let propagated =
                record.is_race() && flagged.contains(&(record.round, record.driver.clone()));
            EventRecord {
                fastest_lap: hit || propagated,
                ..record
            }
        })
        .collect()
}

fn exceeds_position_share(record: &EventRecord, points: &[f64]) -> bool {
    let base = record
        .classification
        .position()
        .map(|p| table_lookup(points, p))
        .unwrap_or(0.0);
    record.official_points > base * record.shared_factor + FASTEST_LAP_TOLERANCE
}
