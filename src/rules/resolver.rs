use crate::error::ScoringError;

/// Look up the value effective in `year`: the entry with the greatest key that
/// is not after `year`. Keys need not be sorted.
pub fn resolve<T>(year: u16, table: &[(u16, T)]) -> Result<&T, ScoringError> {
    table
        .iter()
        .filter(|(from, _)| *from <= year)
        .max_by_key(|(from, _)| *from)
        .map(|(_, value)| value)
        .ok_or_else(|| ScoringError::NoApplicableRule {
            year,
            earliest: earliest_year(table).unwrap_or(year),
        })
}

/// First year any entry of `table` applies to.
pub fn earliest_year<T>(table: &[(u16, T)]) -> Option<u16> {
    table.iter().map(|(from, _)| *from).min()
}
