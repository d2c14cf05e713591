use std::fmt;

use crate::domain::RaceHistoryEntry;

/// A race shorter than this never counts as a real session.
pub const MIN_RACE_LAPS: i64 = 6;
pub const MIN_DRIVERS: usize = 2;

/// Why a detected race was not persisted. None of these are errors; short
/// practice sessions are the normal case on a busy server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotFinished,
    NoRaceStage,
    TooFewLaps(i64),
    TooFewDrivers(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFinished => write!(f, "session not finished"),
            SkipReason::NoRaceStage => write!(f, "no race stage"),
            SkipReason::TooFewLaps(laps) => {
                write!(f, "only {laps} laps (minimum {MIN_RACE_LAPS})")
            }
            SkipReason::TooFewDrivers(drivers) => {
                write!(f, "only {drivers} drivers (minimum {MIN_DRIVERS})")
            }
        }
    }
}

/// The completion predicate. A race passing this is persisted exactly once.
pub fn completion_check(race: &RaceHistoryEntry) -> Result<(), SkipReason> {
    if !race.finished {
        return Err(SkipReason::NotFinished);
    }

    let Some(stage) = race.race_stage() else {
        return Err(SkipReason::NoRaceStage);
    };

    let max_lap = stage
        .results
        .values()
        .map(|r| r.attributes.lap)
        .max()
        .unwrap_or(0);
    if max_lap < MIN_RACE_LAPS {
        return Err(SkipReason::TooFewLaps(max_lap));
    }

    if stage.results.len() < MIN_DRIVERS {
        return Err(SkipReason::TooFewDrivers(stage.results.len()));
    }

    Ok(())
}
