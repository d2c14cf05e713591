mod laps;
mod parser;

pub use laps::{laps_for, CompletedLap};
pub use parser::{current_race, parse_snapshot, read_snapshot};
