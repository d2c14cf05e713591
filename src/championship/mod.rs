mod linker;
mod points;

pub use linker::{LinkOutcome, RaceLinker, UnlinkOutcome};
pub use points::points_for_position;
