//! Run settings read from the environment (a `.env` file is loaded by the CLI).

use std::time::Duration;

use chrono::NaiveDate;
use efdsearch_api::Session;

use crate::error::DisclosureError;
use crate::validation;

pub const DEFAULT_BASE_URL: &str = "https://efdsearch.senate.gov";
pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_SUBMITTED_START: &str = "01/01/2012";

/// Everything a pipeline run needs besides its filters.
#[derive(Clone, Debug)]
pub struct Settings {
    pub session: Session,
    pub base_url: String,
    pub page_size: i64,
    /// Pause between consecutive requests to the portal.
    pub request_delay: Duration,
    pub submitted_start: NaiveDate,
}

impl Settings {
    /// Reads `CSRF_TOKEN`, `SESSION_ID`, `EFD_BASE_URL`, `EFD_PAGE_SIZE`,
    /// `EFD_REQUEST_DELAY_MS` and `EFD_SUBMITTED_START`.
    pub fn from_env() -> Result<Self, DisclosureError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DisclosureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let csrf_token = validation::validate_credential(
            "CSRF_TOKEN",
            &lookup("CSRF_TOKEN").unwrap_or_default(),
        )?;
        let session_id = validation::validate_credential(
            "SESSION_ID",
            &lookup("SESSION_ID").unwrap_or_default(),
        )?;

        let base_url = lookup("EFD_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let page_size = match lookup("EFD_PAGE_SIZE") {
            Some(raw) => validation::validate_page_size(parse_number("EFD_PAGE_SIZE", &raw)?)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let delay_ms = match lookup("EFD_REQUEST_DELAY_MS") {
            Some(raw) => validation::validate_delay_ms(parse_number("EFD_REQUEST_DELAY_MS", &raw)?)?,
            None => DEFAULT_DELAY_MS,
        };

        let submitted_start = validation::validate_submitted_date(
            &lookup("EFD_SUBMITTED_START").unwrap_or_else(|| DEFAULT_SUBMITTED_START.to_string()),
        )?;

        Ok(Self {
            session: Session::new(csrf_token, session_id),
            base_url,
            page_size,
            request_delay: Duration::from_millis(delay_ms),
            submitted_start,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, DisclosureError> {
    raw.trim()
        .parse()
        .map_err(|_| DisclosureError::InvalidInput(format!("{} is not a number: {:?}", name, raw)))
}
