use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::custom::{CustomRules, FastestLapSetting};
use super::resolver::resolve;
use super::tables::{
    season_rounds, BASE_POINTS, DOUBLE_POINTS_FINAL_YEAR, DROP_POLICIES,
    FASTEST_LAP_MAX_POSITION, HALF_POINTS_ROUNDS, SHARED_FASTEST_LAP_YEARS, SPRINT_POINTS,
    TOP_TEN_FASTEST_LAP_YEARS, VOIDED_FASTEST_LAP_ROUNDS,
};
use crate::error::ScoringError;

/// Which of a driver's per-round scores count towards their total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropPolicy {
    CountAll,
    BestOf(usize),
    /// Best `first` results from the first half of the season plus best
    /// `second` from the second half.
    Split { first: usize, second: usize },
}

impl DropPolicy {
    /// Parse "all", "best_N", a bare "N", or "split_N_M".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(DropPolicy::CountAll)
        } else if let Some(rest) = s.strip_prefix("split_") {
            match rest.split_once('_') {
                Some((first, second)) => Ok(DropPolicy::Split {
                    first: first.trim().parse()?,
                    second: second.trim().parse()?,
                }),
                None => bail!("Split policy needs two limits: {}", s),
            }
        } else if let Some(n) = s.strip_prefix("best_") {
            Ok(DropPolicy::BestOf(n.trim().parse()?))
        } else {
            match s.parse() {
                Ok(n) => Ok(DropPolicy::BestOf(n)),
                Err(_) => bail!("Drop policy must be 'all', 'best_N' or 'split_N_M': {}", s),
            }
        }
    }
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropPolicy::CountAll => write!(f, "all results count"),
            DropPolicy::BestOf(n) => write!(f, "best {} results", n),
            DropPolicy::Split { first, second } => {
                write!(f, "best {} of first half + best {} of second half", first, second)
            }
        }
    }
}

/// Points for sprint sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SprintScoring {
    None,
    Table(Vec<f64>),
}

/// How a race's fastest lap is rewarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FastestLapRule {
    None,
    /// One point split evenly between everyone who set the fastest lap,
    /// finishers or not.
    SharedPoint,
    /// One point, only for a finisher at or above `max_position`. Never paid in
    /// `voided_rounds`.
    TopFinisher {
        max_position: u32,
        voided_rounds: Vec<u32>,
    },
}

/// Where a ruleset's parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSource {
    Year(u16),
    Custom,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Year(year) => write!(f, "{} rules", year),
            RuleSource::Custom => write!(f, "custom rules"),
        }
    }
}

/// Every scoring parameter needed to replay one season.
///
/// Built once per (rule year, season) and passed to every scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub source: RuleSource,
    pub season: u16,
    pub points: Vec<f64>,
    pub drop_policy: DropPolicy,
    pub half_points_rounds: Vec<u32>,
    pub double_points_final: bool,
    pub sprint: SprintScoring,
    pub fastest_lap: FastestLapRule,
}

impl Ruleset {
    /// Resolve the rules of `rule_year` for replaying `season`.
    ///
    /// Half-points races and voided fastest laps belong to the season being
    /// replayed, not to the rule year.
    pub fn resolve(rule_year: u16, season: u16) -> Result<Self, ScoringError> {
        let points = resolve(rule_year, BASE_POINTS)?.to_vec();
        let drop_policy = *resolve(rule_year, DROP_POLICIES)?;
        let sprint = match resolve(rule_year, SPRINT_POINTS) {
            Ok(table) => SprintScoring::Table(table.to_vec()),
            Err(_) => SprintScoring::None,
        };

        Ok(Self {
            source: RuleSource::Year(rule_year),
            season,
            points,
            drop_policy,
            half_points_rounds: season_rounds(HALF_POINTS_ROUNDS, season),
            double_points_final: rule_year == DOUBLE_POINTS_FINAL_YEAR,
            sprint,
            fastest_lap: fastest_lap_rule(rule_year, season),
        })
    }

    /// The rules the season was actually run under.
    pub fn official(season: u16) -> Result<Self, ScoringError> {
        Self::resolve(season, season)
    }

    /// Build a ruleset from user-supplied parameters for replaying `season`.
    ///
    /// Call [`validate_custom_rules`](super::validate_custom_rules) first; this
    /// returns the first problem it meets.
    pub fn from_custom(custom: &CustomRules, season: u16) -> Result<Self> {
        let drop_policy = match &custom.drop {
            Some(drop) => DropPolicy::parse(drop)?,
            None => DropPolicy::CountAll,
        };
        let sprint = match &custom.sprint_points {
            Some(points) if !points.is_empty() => SprintScoring::Table(points.clone()),
            _ => SprintScoring::None,
        };
        let fastest_lap = match custom.fastest_lap.unwrap_or_default() {
            FastestLapSetting::None => FastestLapRule::None,
            FastestLapSetting::Shared => FastestLapRule::SharedPoint,
            FastestLapSetting::Top10 => FastestLapRule::TopFinisher {
                max_position: FASTEST_LAP_MAX_POSITION,
                voided_rounds: season_rounds(VOIDED_FASTEST_LAP_ROUNDS, season),
            },
        };

        Ok(Self {
            source: RuleSource::Custom,
            season,
            points: custom.points.clone(),
            drop_policy,
            half_points_rounds: season_rounds(HALF_POINTS_ROUNDS, season),
            double_points_final: custom.double_points_final.unwrap_or(false),
            sprint,
            fastest_lap,
        })
    }

    /// Points for a classified position, 0 beyond the table.
    pub fn points_for(&self, position: u32) -> f64 {
        table_lookup(&self.points, position)
    }

    pub fn is_half_points_round(&self, round: u32) -> bool {
        self.half_points_rounds.contains(&round)
    }
}

pub(crate) fn table_lookup(table: &[f64], position: u32) -> f64 {
    match position {
        0 => 0.0,
        p => table.get(p as usize - 1).copied().unwrap_or(0.0),
    }
}

fn fastest_lap_rule(rule_year: u16, season: u16) -> FastestLapRule {
    let in_era = |(from, to): (u16, u16)| (from..=to).contains(&rule_year);
    if in_era(SHARED_FASTEST_LAP_YEARS) {
        FastestLapRule::SharedPoint
    } else if in_era(TOP_TEN_FASTEST_LAP_YEARS) {
        FastestLapRule::TopFinisher {
            max_position: FASTEST_LAP_MAX_POSITION,
            voided_rounds: season_rounds(VOIDED_FASTEST_LAP_ROUNDS, season),
        }
    } else {
        FastestLapRule::None
    }
}
