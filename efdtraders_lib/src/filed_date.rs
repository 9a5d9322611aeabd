//! Recovery of the "Filed" date printed in a filing's header.

use regex::Regex;

use crate::error::DisclosureError;

/// `Filed 01/16/2020 @ 10:41 AM`
const FILED_PATTERN: &str = r"Filed\s+(\d{2}/\d{2}/\d{4})\s+@\s+\d{1,2}:\d{2}\s+[AP]M";

/// Compiled matcher for the filed-date sentinel. Build once per run and
/// reuse it across filings.
pub struct FiledDateExtractor {
    pattern: Regex,
}

impl FiledDateExtractor {
    pub fn new() -> Result<Self, DisclosureError> {
        let pattern = Regex::new(FILED_PATTERN)
            .map_err(|e| DisclosureError::Parse(format!("regex compile error: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Returns the `MM/DD/YYYY` part of the first "Filed" sentinel in
    /// `page_text`, or `None` when the page does not print one.
    pub fn extract(&self, page_text: &str) -> Option<String> {
        let found = self
            .pattern
            .captures(page_text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string());
        if found.is_none() {
            tracing::debug!("No 'Filed' sentinel found; filing date unknown");
        }
        found
    }
}

/// Convenience wrapper compiling the pattern for a single lookup.
pub fn extract_filed_date(page_text: &str) -> Option<String> {
    FiledDateExtractor::new()
        .ok()
        .and_then(|extractor| extractor.extract(page_text))
}
