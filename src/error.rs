use thiserror::Error;

/// Failures the scoring engine knows how to name.
///
/// Only `NoApplicableRule` is ever returned to callers. `MissingData` and
/// `MalformedRecord` are recovered where they occur (empty season, zero-valued
/// record) and exist so the recovery can be logged with a consistent message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("no results recorded for season {season}")]
    MissingData { season: u16 },

    #[error("malformed record for {driver} in round {round}: {reason}")]
    MalformedRecord {
        driver: String,
        round: u32,
        reason: String,
    },

    #[error("no scoring rule applies to {year} (earliest rule is from {earliest})")]
    NoApplicableRule { year: u16, earliest: u16 },
}
