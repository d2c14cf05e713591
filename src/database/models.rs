use serde::Serialize;

/// Summary row of one persisted race. `id` and `event_id` are populated on
/// read; inserts receive them from the database.
#[derive(Debug, Clone, Serialize)]
pub struct RaceRecord {
    pub id: i64,
    pub race_index: i64,
    pub track_name: String,
    pub track_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    pub total_laps: i64,
    pub total_drivers: i64,
    pub winner_name: String,
    pub winner_time: i64,
    pub fastest_lap_driver: String,
    pub fastest_lap_time: i64,
    pub total_collisions: i64,
    pub summary_json: String,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRecord {
    pub participant_id: i64,
    pub ref_id: i64,
    pub name: String,
    pub is_player: bool,
    pub vehicle_id: i64,
    pub vehicle_name: String,
    pub vehicle_class: String,
    pub position: i64,
    pub fastest_lap_time: i64,
    pub total_time: i64,
    pub state: String,
    pub lap_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LapRecord {
    pub participant_id: i64,
    pub lap_number: i64,
    pub lap_time: i64,
    pub sector1_time: i64,
    pub sector2_time: i64,
    pub sector3_time: i64,
    pub position: i64,
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct Pilot {
    pub id: i64,
    pub name: String,
    pub is_human: bool,
}

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub id: i64,
    pub championship_id: i64,
    pub name: String,
    pub status: String,
}

/// Scored result of one pilot at one event.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub pilot_id: i64,
    pub position: i64,
    pub points: i64,
    pub status: String,
}

/// Roster row joined with its pilot.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub pilot_id: i64,
    pub pilot_name: String,
    pub is_human: bool,
    pub roster_position: i64,
    pub is_reference: bool,
    pub source_event_id: Option<i64>,
}
