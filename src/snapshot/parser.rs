use std::path::Path;

use crate::domain::{RaceHistoryEntry, StatsDocument};
use crate::errors::SnapshotError;

/// Read and decode the stats file at `path`.
pub fn read_snapshot(path: &Path) -> Result<StatsDocument, SnapshotError> {
    parse_snapshot(&std::fs::read_to_string(path)?)
}

/// Decode the raw stats file.
///
/// The server prepends a `//`-style comment banner that is not valid JSON;
/// every such line is dropped before decoding. A decode failure is the
/// transient `Malformed` case: the writer rewrites the whole file and the
/// next poll sees a consistent document again.
pub fn parse_snapshot(raw: &str) -> Result<StatsDocument, SnapshotError> {
    let json = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(serde_json::from_str(&json)?)
}

/// The race to act on: the last history entry carrying a `race1` stage.
/// `None` is the legitimate idle state, not an error.
pub fn current_race(document: &StatsDocument) -> Option<&RaceHistoryEntry> {
    document
        .stats
        .history
        .iter()
        .rev()
        .find(|entry| entry.race_stage().is_some())
}
