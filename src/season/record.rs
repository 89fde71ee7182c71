use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of session a result comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Race,
    Sprint,
    Other,
}

impl SessionKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" => SessionKind::Race,
            "sprint" => SessionKind::Sprint,
            _ => SessionKind::Other,
        }
    }
}

/// Non-finishing codes used by the timing data: retired, disqualified,
/// excluded, withdrawn, failed to qualify, not classified.
const KNOWN_CODES: &[&str] = &["R", "D", "E", "W", "F", "N"];

/// Where a participant was classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Position(u32),
    NotClassified(String),
    Missing,
}

impl Classification {
    /// Parse a raw classified position such as `"3"`, `"3.0"` or `"R"`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Classification::Missing;
        }
        match raw.parse::<f64>() {
            Ok(value) => Self::from_number(value).unwrap_or_else(|| {
                Classification::NotClassified(raw.to_string())
            }),
            Err(_) => Classification::NotClassified(raw.to_string()),
        }
    }

    /// A whole number ≥ 1 is a position; anything else is not.
    pub fn from_number(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
            Some(Classification::Position(value as u32))
        } else {
            None
        }
    }

    pub fn position(&self) -> Option<u32> {
        match self {
            Classification::Position(p) => Some(*p),
            _ => None,
        }
    }

    /// True for codes the timing data is known to produce. Anything else not
    /// numeric points at a broken row.
    pub fn is_recognized(&self) -> bool {
        match self {
            Classification::Position(_) | Classification::Missing => true,
            Classification::NotClassified(code) => KNOWN_CODES.contains(&code.as_str()),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Position(p) => write!(f, "{}", p),
            Classification::NotClassified(code) => write!(f, "{}", code),
            Classification::Missing => write!(f, "-"),
        }
    }
}

/// One participant's result in one session of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub driver: String,
    pub abbreviation: Option<String>,
    pub session: SessionKind,
    pub round: u32,
    pub classification: Classification,
    pub status: Option<String>,
    /// Points awarded at the time
    pub official_points: f64,
    pub fastest_lap: bool,
    /// Share of the position's points, below 1.0 for shared drives
    pub shared_factor: f64,
}

impl EventRecord {
    /// A record with no shared drive, no fastest lap and no official points.
    pub fn new(
        driver: impl Into<String>,
        session: SessionKind,
        round: u32,
        classification: Classification,
    ) -> Self {
        Self {
            driver: driver.into(),
            abbreviation: None,
            session,
            round,
            classification,
            status: None,
            official_points: 0.0,
            fastest_lap: false,
            shared_factor: 1.0,
        }
    }

    pub fn with_official_points(mut self, points: f64) -> Self {
        self.official_points = points;
        self
    }

    pub fn with_fastest_lap(mut self, fastest_lap: bool) -> Self {
        self.fastest_lap = fastest_lap;
        self
    }

    pub fn is_race(&self) -> bool {
        self.session == SessionKind::Race
    }
}

/// Number of rounds in a season: the highest round present.
pub fn total_rounds(records: &[EventRecord]) -> u32 {
    records.iter().map(|r| r.round).max().unwrap_or(0)
}

/// Distinct rounds present, ascending.
pub fn rounds(records: &[EventRecord]) -> Vec<u32> {
    let mut rounds: Vec<u32> = records.iter().map(|r| r.round).collect();
    rounds.sort_unstable();
    rounds.dedup();
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_kind() {
        assert_eq!(SessionKind::parse("Race"), SessionKind::Race);
        assert_eq!(SessionKind::parse("sprint"), SessionKind::Sprint);
        assert_eq!(SessionKind::parse("Qualifying"), SessionKind::Other);
        assert_eq!(SessionKind::parse(""), SessionKind::Other);
    }

    #[test]
    fn test_parse_classification_positions() {
        assert_eq!(Classification::parse("1"), Classification::Position(1));
        assert_eq!(Classification::parse(" 12 "), Classification::Position(12));
        assert_eq!(Classification::parse("4.0"), Classification::Position(4));
    }

    #[test]
    fn test_parse_classification_codes() {
        assert_eq!(Classification::parse("R"), Classification::NotClassified("R".to_string()));
        assert_eq!(Classification::parse("0"), Classification::NotClassified("0".to_string()));
        assert_eq!(Classification::parse("2.5"), Classification::NotClassified("2.5".to_string()));
        assert_eq!(Classification::parse(""), Classification::Missing);
        assert_eq!(Classification::parse("NaN"), Classification::Missing);
    }

    #[test]
    fn test_classification_recognized() {
        assert!(Classification::Position(3).is_recognized());
        assert!(Classification::Missing.is_recognized());
        assert!(Classification::parse("D").is_recognized());
        assert!(!Classification::parse("first").is_recognized());
        assert!(!Classification::parse("-1").is_recognized());
    }

    #[test]
    fn test_classification_from_number() {
        assert_eq!(Classification::from_number(7.0), Some(Classification::Position(7)));
        assert_eq!(Classification::from_number(0.0), None);
        assert_eq!(Classification::from_number(f64::NAN), None);
        assert_eq!(Classification::from_number(1.5), None);
    }

    #[test]
    fn test_total_rounds_and_rounds() {
        let records = vec![
            EventRecord::new("A", SessionKind::Race, 3, Classification::Position(1)),
            EventRecord::new("A", SessionKind::Race, 1, Classification::Position(2)),
            EventRecord::new("B", SessionKind::Sprint, 3, Classification::Position(1)),
        ];
        assert_eq!(total_rounds(&records), 3);
        assert_eq!(rounds(&records), vec![1, 3]);
        assert_eq!(total_rounds(&[]), 0);
    }
}
