pub mod championships;
pub mod connection;
pub mod events;
pub mod models;
pub mod pilots;
pub mod race_laps;
pub mod race_participants;
pub mod races;
pub mod results;
pub mod roster;
pub mod settings;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, DbConn, DbPool};
pub use models::{
    EventRecord, LapRecord, ParticipantRecord, Pilot, RaceRecord, ResultRecord, RosterEntry,
};
