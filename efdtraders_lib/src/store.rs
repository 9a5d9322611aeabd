//! Timestamped JSON output files.
//!
//! Each run writes `<prefix>_<unix seconds>.json`. Consumers pick the most
//! recent run by the largest embedded timestamp. Existing files are never
//! overwritten: a run landing on a taken second moves to the next free one.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DisclosureError;

pub const INDIVIDUALS_PREFIX: &str = "individuals";
pub const PORTFOLIOS_PREFIX: &str = "portfolios";

/// Seconds past the requested timestamp tried before giving up.
const MAX_COLLISIONS: i64 = 1000;

pub fn output_path(dir: &Path, prefix: &str, timestamp: i64) -> PathBuf {
    dir.join(format!("{}_{}.json", prefix, timestamp))
}

/// Writes `records` as a pretty JSON array stamped with the current time.
pub fn write_json<T: Serialize>(
    dir: &Path,
    prefix: &str,
    records: &[T],
) -> Result<PathBuf, DisclosureError> {
    write_json_at(dir, prefix, Utc::now().timestamp(), records)
}

pub fn write_json_at<T: Serialize>(
    dir: &Path,
    prefix: &str,
    timestamp: i64,
    records: &[T],
) -> Result<PathBuf, DisclosureError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(records)?;
    for ts in timestamp..timestamp + MAX_COLLISIONS {
        let path = output_path(dir, prefix, ts);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("{} exists, trying the next second", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(json.as_bytes())?;
        tracing::info!("Wrote {} records to {}", records.len(), path.display());
        return Ok(path);
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "no free {}_<timestamp>.json name in {} from {}",
            prefix,
            dir.display(),
            timestamp
        ),
    )
    .into())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DisclosureError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Timestamp embedded in `<prefix>_<ts>.json`, if the name has that shape.
fn timestamp_of(file_name: &str, prefix: &str) -> Option<i64> {
    let ts = file_name
        .strip_prefix(prefix)?
        .strip_prefix('_')?
        .strip_suffix(".json")?;
    if ts.is_empty() || !ts.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    ts.parse().ok()
}

/// The output file in `dir` with the greatest timestamp for `prefix`.
pub fn latest_output(dir: &Path, prefix: &str) -> Result<Option<PathBuf>, DisclosureError> {
    if !dir.exists() {
        return Ok(None);
    }
    let mut best: Option<(i64, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(ts) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| timestamp_of(n, prefix))
        else {
            continue;
        };
        if best.as_ref().map_or(true, |(b, _)| ts > *b) {
            best = Some((ts, path));
        }
    }
    Ok(best.map(|(_, path)| path))
}
