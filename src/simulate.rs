use serde::Serialize;

use crate::error::ScoringError;
use crate::rules::{resolve, tables::DROP_POLICIES, Ruleset};
use crate::scoring::{
    aggregate, compare, official_standings, score_season, ComparisonRow, Progression, StandingsRow,
};
use crate::season::{total_rounds, EventRecord, Season};

/// A season replayed under one ruleset next to its official outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Simulation {
    pub simulated: Vec<StandingsRow>,
    pub official: Vec<StandingsRow>,
    pub comparison: Vec<ComparisonRow>,
}

impl Simulation {
    pub fn is_empty(&self) -> bool {
        self.comparison.is_empty()
    }
}

/// Standings of `records` scored under `rules`.
pub fn simulated_standings(records: &[EventRecord], rules: &Ruleset) -> Vec<StandingsRow> {
    let scored = score_season(records, rules);
    aggregate(&scored, rules.drop_policy, total_rounds(records))
}

/// Standings from the official points, counted the way `season` counted them.
pub fn official_season_standings(
    records: &[EventRecord],
    season: u16,
) -> Result<Vec<StandingsRow>, ScoringError> {
    let policy = *resolve(season, DROP_POLICIES)?;
    Ok(official_standings(records, policy, total_rounds(records)))
}

/// Replay `season` under `rules` and compare with the official standings.
///
/// A season without records gives an empty simulation.
pub fn simulate(season: &Season, rules: &Ruleset) -> Result<Simulation, ScoringError> {
    if season.is_empty() {
        log::debug!("{}", ScoringError::MissingData { season: season.year });
        return Ok(Simulation::default());
    }

    let simulated = simulated_standings(&season.records, rules);
    let official = official_season_standings(&season.records, season.year)?;
    let comparison = compare(&simulated, &official);

    log::debug!(
        "Simulated {} under {}: {} drivers, {} with points",
        season.year,
        rules.source,
        comparison.len(),
        simulated.iter().filter(|r| r.points > 0.0).count()
    );

    Ok(Simulation {
        simulated,
        official,
        comparison,
    })
}

/// Drivers to chart in a progression view.
///
/// Explicitly requested names are kept in request order when they scored in
/// either system; otherwise the top `top` simulated scorers are used.
pub fn progression_drivers(
    progression: &Progression,
    simulated: &[StandingsRow],
    requested: &[String],
    top: usize,
) -> Vec<String> {
    let scoring = progression.scoring_drivers();

    if !requested.is_empty() {
        return requested
            .iter()
            .filter(|name| {
                let known = scoring.contains(name);
                if !known {
                    log::warn!("{} did not score in this season, skipping", name);
                }
                known
            })
            .cloned()
            .collect();
    }

    simulated
        .iter()
        .filter(|row| scoring.contains(&row.driver))
        .take(top)
        .map(|row| row.driver.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Change;
    use crate::season::{Classification, SessionKind};

    fn race(driver: &str, round: u32, position: u32, official: f64) -> EventRecord {
        EventRecord::new(driver, SessionKind::Race, round, Classification::Position(position))
            .with_official_points(official)
    }

    #[test]
    fn test_empty_season() {
        let rules = Ruleset::resolve(2010, 1976).unwrap();
        let simulation = simulate(&Season::empty(1976), &rules).unwrap();
        assert!(simulation.is_empty());
        assert!(simulation.simulated.is_empty());
        assert!(simulation.official.is_empty());
    }

    #[test]
    fn test_modern_rules_flip_vintage_title() {
        // A wins five races then fades; B is second every round. Best-5
        // counting hides B's consistency, counting everything rewards it.
        let mut records = Vec::new();
        for round in 1..=8 {
            if round <= 5 {
                records.push(race("A", round, 1, 9.0));
            } else {
                records.push(race("A", round, 12, 0.0));
            }
            records.push(race("B", round, 2, 6.0));
        }
        let season = Season { year: 1961, records };

        let official = Ruleset::official(1961).unwrap();
        let replay = simulate(&season, &official).unwrap();
        assert_eq!(replay.comparison[0].driver, "A");
        assert_eq!(replay.comparison[0].simulated_points, 45.0);
        assert!(replay.comparison.iter().all(|r| r.change == Change::Unchanged));

        let modern = Ruleset::resolve(2010, 1961).unwrap();
        let what_if = simulate(&season, &modern).unwrap();
        assert_eq!(what_if.comparison[0].driver, "B");
        assert_eq!(what_if.comparison[0].simulated_points, 144.0);
        assert_eq!(what_if.comparison[0].change, Change::Improved(1));
        assert_eq!(what_if.comparison[1].driver, "A");
        assert_eq!(what_if.comparison[1].simulated_points, 125.0);
        assert_eq!(what_if.comparison[1].change, Change::Worsened(1));
    }

    #[test]
    fn test_official_season_standings_unknown_year() {
        assert!(official_season_standings(&[race("A", 1, 1, 8.0)], 1949).is_err());
    }

    #[test]
    fn test_progression_drivers_top_and_requested() {
        let records = vec![
            race("A", 1, 1, 9.0),
            race("B", 1, 2, 6.0),
            race("C", 1, 3, 4.0),
            race("D", 1, 15, 0.0),
        ];
        let rules = Ruleset::resolve(2010, 1961).unwrap();
        let progression = crate::scoring::progression(&records, &rules).unwrap();
        let standings = simulated_standings(&records, &rules);

        assert_eq!(progression_drivers(&progression, &standings, &[], 2), vec!["A", "B"]);
        // D never scored, so it drops out even with room to spare
        assert_eq!(progression_drivers(&progression, &standings, &[], 10), vec!["A", "B", "C"]);

        let requested = vec!["C".to_string(), "D".to_string(), "A".to_string()];
        assert_eq!(progression_drivers(&progression, &standings, &requested, 2), vec!["C", "A"]);
    }
}
