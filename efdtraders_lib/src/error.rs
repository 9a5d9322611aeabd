//! Error types for the extraction pipeline.

use std::fmt;

/// Errors produced while turning search listings and filing pages into
/// portfolios.
///
/// Only [`DisclosureError::AuthenticationRequired`] aborts a run; every other
/// variant costs at most one page, one filing, or one row.
#[derive(Debug)]
pub enum DisclosureError {
    /// No usable session: credentials missing, rejected, or expired.
    AuthenticationRequired,
    /// The filing page has no table where its report kind puts one.
    TableNotFound(String),
    /// An amount cell is not a `$low - $high` range.
    MalformedAmount(String),
    /// The filing link is neither a periodic nor an annual report.
    UnsupportedReportKind(String),
    /// A fetch failed for a reason other than authentication.
    NetworkFailure(efdsearch_api::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// Reading or writing an output file failed.
    Io(std::io::Error),
    /// User-provided input or configuration failed validation.
    InvalidInput(String),
    /// A page could not be parsed (bad selector, unexpected row shape).
    Parse(String),
}

impl DisclosureError {
    /// Whether the pipeline must stop instead of skipping the current item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }
}

impl fmt::Display for DisclosureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationRequired => {
                write!(f, "Authentication required: set CSRF_TOKEN and SESSION_ID")
            }
            Self::TableNotFound(what) => write!(f, "Table not found: {}", what),
            Self::MalformedAmount(text) => write!(f, "Malformed amount: {:?}", text),
            Self::UnsupportedReportKind(link) => {
                write!(f, "Unsupported report kind: {}", link)
            }
            Self::NetworkFailure(e) => write!(f, "Network failure: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for DisclosureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NetworkFailure(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<efdsearch_api::Error> for DisclosureError {
    fn from(e: efdsearch_api::Error) -> Self {
        match e {
            efdsearch_api::Error::AuthenticationRequired => Self::AuthenticationRequired,
            other => Self::NetworkFailure(other),
        }
    }
}

impl From<serde_json::Error> for DisclosureError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<std::io::Error> for DisclosureError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
