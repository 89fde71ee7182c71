/// Seasons whose official numbers carry a quirk a replay cannot see.
const NOTES: &[(u16, &str)] = &[
    (
        1954,
        "Seven drivers shared the fastest lap at the British Grand Prix; \
         each received 1/7 of a point.",
    ),
    (
        1983,
        "Keke Rosberg was disqualified from second in Brazil and the \
         second-place points were never reassigned.",
    ),
    (
        1984,
        "The Monaco Grand Prix was stopped early in the rain and paid half points.",
    ),
    (
        2021,
        "The Belgian Grand Prix ran only behind the safety car; half points \
         were paid and no fastest-lap point was awarded.",
    ),
];

/// A short explanation of official totals that look odd for `season`.
pub fn historical_note(season: u16) -> Option<&'static str> {
    NOTES
        .iter()
        .find(|(year, _)| *year == season)
        .map(|(_, note)| *note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_seasons_have_notes() {
        for season in [1954, 1983, 1984, 2021] {
            assert!(historical_note(season).is_some(), "{}", season);
        }
        assert!(historical_note(1954).unwrap().contains("1/7"));
    }

    #[test]
    fn test_other_seasons_have_none() {
        assert_eq!(historical_note(1976), None);
        assert_eq!(historical_note(2025), None);
    }
}
