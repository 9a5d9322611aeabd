//! Filter identifiers accepted by the search listing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of report to search for. The numeric value is the portal's id.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportType {
    /// Annual financial disclosure report.
    #[serde(rename = "annual")]
    Annual = 7,

    /// Periodic transaction report (PTR).
    #[serde(rename = "ptr")]
    PeriodicTransaction = 11,
}
impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i64)
    }
}
impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "7" => Ok(ReportType::Annual),
            "ptr" | "periodic" | "periodic-transactions" | "11" => {
                Ok(ReportType::PeriodicTransaction)
            }
            other => Err(format!("unknown report type '{}'", other)),
        }
    }
}

/// Category of filer to search for. The numeric value is the portal's id.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilerType {
    /// Sitting senator.
    #[serde(rename = "senator")]
    Senator = 1,

    /// Candidate for the Senate.
    #[serde(rename = "candidate")]
    Candidate = 4,

    /// Former senator.
    #[serde(rename = "former-senator")]
    FormerSenator = 5,
}
impl std::fmt::Display for FilerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i64)
    }
}
impl FromStr for FilerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "senator" | "1" => Ok(FilerType::Senator),
            "candidate" | "4" => Ok(FilerType::Candidate),
            "former-senator" | "former" | "5" => Ok(FilerType::FormerSenator),
            other => Err(format!("unknown filer type '{}'", other)),
        }
    }
}
