pub mod aggregate;
pub mod compare;
pub mod event;
pub mod progression;

pub use aggregate::{aggregate, counted_points, official_standings, StandingsRow};
pub use compare::{compare, dense_ranks, Change, ComparisonRow};
pub use event::{base_points, bonus_points, fastest_lap_shares, round_to, score_record, score_season, ScoredRecord};
pub use progression::{progression, Progression, ProgressionPoint};
