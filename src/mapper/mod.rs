mod mapping;
mod shuffle;
mod types;

pub use mapping::map_participants;
pub use shuffle::fisher_yates;
pub use types::{MappingResult, MatchKind, RaceFinisher, ReferencePilot};
