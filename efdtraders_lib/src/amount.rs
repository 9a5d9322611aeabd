//! Parsing of disclosed dollar brackets such as `$1,001 - $15,000`.

use crate::error::DisclosureError;
use crate::model::AmountRange;

/// Parses a `$low - $high` range.
///
/// Currency symbols, grouping commas and surrounding whitespace are
/// dropped. Exactly two numeric halves are required and `low` may not
/// exceed `high`; anything else is [`DisclosureError::MalformedAmount`].
pub fn parse_amount(text: &str) -> Result<AmountRange, DisclosureError> {
    let malformed = || DisclosureError::MalformedAmount(text.trim().to_string());

    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    let halves: Vec<&str> = cleaned
        .split('-')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let [low, high] = halves.as_slice() else {
        return Err(malformed());
    };

    let low: u64 = low.parse().map_err(|_| malformed())?;
    let high: u64 = high.parse().map_err(|_| malformed())?;
    if low > high {
        return Err(malformed());
    }
    Ok(AmountRange(low, high))
}
