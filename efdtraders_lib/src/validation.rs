use chrono::NaiveDate;
use efdsearch_api::types::{FilerType, ReportType};

use crate::error::DisclosureError;

/// Largest page the search listing serves.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound for the delay between requests, in milliseconds.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Validate page size: must be 1..=100.
pub fn validate_page_size(page_size: i64) -> Result<i64, DisclosureError> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(DisclosureError::InvalidInput(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(page_size)
}

/// Validate a delay between requests: 0..=60000 ms.
pub fn validate_delay_ms(delay_ms: u64) -> Result<u64, DisclosureError> {
    if delay_ms > MAX_DELAY_MS {
        return Err(DisclosureError::InvalidInput(format!(
            "delay must be at most {} ms, got {}",
            MAX_DELAY_MS, delay_ms
        )));
    }
    Ok(delay_ms)
}

/// Validate a submission date in the portal's `MM/DD/YYYY` format.
pub fn validate_submitted_date(input: &str) -> Result<NaiveDate, DisclosureError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").map_err(|_| {
        DisclosureError::InvalidInput(format!(
            "invalid date '{}'. Expected format: MM/DD/YYYY (e.g., 01/01/2012)",
            trimmed
        ))
    })
}

/// Validate a report type: annual or ptr (case-insensitive).
pub fn validate_report_type(input: &str) -> Result<ReportType, DisclosureError> {
    input.parse::<ReportType>().map_err(|_| {
        DisclosureError::InvalidInput(format!(
            "unknown report type '{}'. Valid values: annual, ptr",
            input.trim()
        ))
    })
}

/// Validate a filer type: senator, candidate or former-senator.
pub fn validate_filer_type(input: &str) -> Result<FilerType, DisclosureError> {
    input.parse::<FilerType>().map_err(|_| {
        DisclosureError::InvalidInput(format!(
            "unknown filer type '{}'. Valid values: senator, candidate, former-senator",
            input.trim()
        ))
    })
}

/// Strip ASCII control characters and surrounding whitespace from a
/// credential, rejecting it when nothing is left.
pub fn validate_credential(name: &str, input: &str) -> Result<String, DisclosureError> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_control()).collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        return Err(DisclosureError::AuthenticationRequired);
    }
    if cleaned.contains(';') || cleaned.contains(' ') {
        return Err(DisclosureError::InvalidInput(format!(
            "{} must not contain spaces or ';'",
            name
        )));
    }
    Ok(cleaned)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
