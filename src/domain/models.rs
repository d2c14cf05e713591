use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root of the dedicated server stats file.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsDocument {
    pub stats: Stats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub history: Vec<RaceHistoryEntry>,
}

/// One session weekend in the server history, oldest first.
#[derive(Debug, Clone, Deserialize)]
pub struct RaceHistoryEntry {
    pub index: i64,
    pub start_time: i64,
    #[serde(default)]
    pub end_time: i64,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub setup: RaceSetup,
    /// Keyed by participant id. Keys may be sparse and reordered between
    /// snapshot rewrites; `refid` is the stable identity.
    #[serde(default)]
    pub participants: BTreeMap<String, Participant>,
    #[serde(default)]
    pub stages: HashMap<String, RaceStage>,
}

impl RaceHistoryEntry {
    /// The only stage the core consumes.
    pub fn race_stage(&self) -> Option<&RaceStage> {
        self.stages.get("race1")
    }

    pub fn race_key(&self) -> RaceKey {
        RaceKey {
            index: self.index,
            start_time: self.start_time,
        }
    }

    /// Participant-map key for a given stable ref id, parsed as the numeric
    /// participant id the results and events use.
    pub fn participant_id_for_refid(&self, refid: i64) -> Option<i64> {
        self.participants
            .iter()
            .find(|(_, p)| p.refid == refid)
            .and_then(|(key, _)| key.parse().ok())
    }

    pub fn participant(&self, participant_id: i64) -> Option<&Participant> {
        self.participants.get(&participant_id.to_string())
    }
}

/// Identity of a race across snapshot rewrites. The upstream server reuses
/// `index` after restarts, so the start time is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaceKey {
    pub index: i64,
    pub start_time: i64,
}

impl fmt::Display for RaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.index, self.start_time)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceSetup {
    #[serde(rename = "TrackId", default)]
    pub track_id: i64,
    #[serde(rename = "RaceLength", default)]
    pub race_length: i64,
    #[serde(rename = "WeatherSlot1", default)]
    pub weather_slot1: Value,
    #[serde(rename = "SessionSetup", default)]
    pub session_setup: Value,
}

/// Registered entrant. The writer emits both snake_case and PascalCase field
/// names depending on the server version, hence the aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Participant {
    #[serde(default, alias = "RefId")]
    pub refid: i64,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "IsPlayer")]
    pub is_player: bool,
    #[serde(default, alias = "VehicleId")]
    pub vehicle_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceStage {
    #[serde(default)]
    pub results: HashMap<String, RaceResult>,
    /// Arrives as a JSON array or as an index-keyed object; either way the
    /// order carries no meaning.
    #[serde(default, deserialize_with = "events_as_list")]
    pub events: Vec<RaceEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceResult {
    #[serde(default)]
    pub participantid: i64,
    #[serde(default)]
    pub refid: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_player: bool,
    #[serde(default)]
    pub attributes: ResultAttributes,
}

impl RaceResult {
    /// A result that still counts in the running order.
    pub fn is_classified(&self) -> bool {
        matches!(self.attributes.state.as_str(), "Finished" | "Racing")
    }
}

/// All times in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultAttributes {
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "RacePosition", default)]
    pub race_position: i64,
    #[serde(rename = "FastestLapTime", default)]
    pub fastest_lap_time: i64,
    #[serde(rename = "Lap", default)]
    pub lap: i64,
    #[serde(rename = "TotalTime", default)]
    pub total_time: i64,
    #[serde(rename = "VehicleId", default)]
    pub vehicle_id: i64,
}

/// Stage event. Only the `Lap` and `Impact` kinds are consumed; everything
/// else deserializes and is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceEvent {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub participantid: i64,
    #[serde(default)]
    pub refid: i64,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub attributes: EventAttributes,
}

impl RaceEvent {
    pub fn is_lap(&self) -> bool {
        self.event_name == "Lap"
    }

    pub fn is_impact(&self) -> bool {
        self.event_name == "Impact"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventAttributes {
    #[serde(rename = "Lap", default)]
    pub lap: i64,
    #[serde(rename = "LapTime", default)]
    pub lap_time: i64,
    #[serde(rename = "Sector1Time", default)]
    pub sector1_time: i64,
    #[serde(rename = "Sector2Time", default)]
    pub sector2_time: i64,
    #[serde(rename = "Sector3Time", default)]
    pub sector3_time: i64,
    #[serde(rename = "RacePosition", default)]
    pub race_position: i64,
    #[serde(rename = "DistanceTravelled", default)]
    pub distance_travelled: f64,
}

fn events_as_list<'de, D>(deserializer: D) -> Result<Vec<RaceEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Events {
        List(Vec<RaceEvent>),
        Indexed(BTreeMap<String, RaceEvent>),
    }

    Ok(match Events::deserialize(deserializer)? {
        Events::List(events) => events,
        Events::Indexed(map) => map.into_values().collect(),
    })
}
