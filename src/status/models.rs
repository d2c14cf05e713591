use serde::Serialize;

/// Everything scraped from one fetch of the `/status` page.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPage {
    pub session: SessionInfo,
    pub participants: Vec<LiveParticipant>,
}

impl Default for StatusPage {
    fn default() -> Self {
        Self {
            session: SessionInfo::default(),
            participants: Vec::new(),
        }
    }
}

/// Session attributes collected from the header/value tables.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub track_id: Option<i64>,
    /// `None` when the id did not resolve, so callers can tell an unknown
    /// circuit apart from a page with no id at all.
    pub track_name: Option<String>,
    pub session_state: String,
    pub session_stage: String,
    /// One-decimal Celsius, from the raw thousandths-of-a-degree value.
    pub track_temperature: Option<f64>,
    pub ambient_temperature: Option<f64>,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            track_id: None,
            track_name: None,
            session_state: "Unknown".to_string(),
            session_stage: "Unknown".to_string(),
            track_temperature: None,
            ambient_temperature: None,
        }
    }
}

/// One row of the Session Participants table, columns in page order.
/// Times in milliseconds, world coordinates in millimetres (Y is height).
#[derive(Debug, Clone, Serialize)]
pub struct LiveParticipant {
    pub participant_id: i64,
    pub ref_id: i64,
    pub name: String,
    pub is_player: bool,
    pub grid_position: i64,
    pub vehicle_id: i64,
    pub livery_id: i64,
    pub race_position: i64,
    pub current_lap: i64,
    pub current_sector: i64,
    pub sector1_time: i64,
    pub sector2_time: i64,
    pub sector3_time: i64,
    pub last_lap_time: i64,
    pub fastest_lap_time: i64,
    pub state: String,
    pub headlights_on: bool,
    pub wipers_level: i64,
    pub speed: i64,
    pub gear: i64,
    pub rpm: i64,
    pub position_x: i64,
    pub position_y: i64,
    pub position_z: i64,
    pub orientation: i64,
}
