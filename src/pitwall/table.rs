use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use super::format::{
    format_gap, format_sector, format_start_time, format_time, SECTOR_PLACEHOLDER,
};
use super::names::clean_name;
use crate::constants::{tracks, vehicles};
use crate::domain::{Participant, RaceEvent, RaceHistoryEntry, RaceStage};

/// Sentinel race position for synthesized did-not-start entries. Always
/// sorted to the end of the table, never compared numerically.
pub const DNS_POSITION: i64 = 999;

/// One row of the live timing table.
#[derive(Debug, Clone, Serialize)]
pub struct DriverEntry {
    pub position: i64,
    pub name: String,
    pub vehicle: String,
    pub class: String,
    pub lap: String,
    pub gap: String,
    pub interval: String,
    pub best_lap: String,
    pub last_lap: String,
    pub sector1: String,
    pub sector2: String,
    pub sector3: String,
    pub state: String,
    pub is_player: bool,
    pub participant_id: i64,
    // Raw milliseconds for comparisons and highlighting.
    pub lap_number: i64,
    pub best_lap_ms: i64,
    pub last_lap_ms: i64,
    pub sector1_ms: i64,
    pub sector2_ms: i64,
    pub sector3_ms: i64,
    pub total_time_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceInfo {
    pub track: String,
    pub current_lap: i64,
    pub total_laps: i64,
    pub start_time: String,
    pub best_lap: String,
    pub fastest_driver: String,
    pub is_finished: bool,
    pub race_index: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PitWall {
    pub race_info: RaceInfo,
    pub drivers: Vec<DriverEntry>,
}

/// Build the ordered driver table for the race stage of one history entry.
pub fn build_pit_wall(race: &RaceHistoryEntry) -> Option<PitWall> {
    let stage = race.race_stage()?;

    // Gap baseline: smallest running total among still-classified results.
    // Map order says nothing about the running order.
    let leader_time = stage
        .results
        .values()
        .filter(|r| r.is_classified())
        .map(|r| r.attributes.total_time)
        .min()
        .unwrap_or(0);

    let (fastest_time, fastest_driver) = overall_fastest_lap(stage);

    let mut drivers: Vec<DriverEntry> = Vec::new();
    let mut seen_refids: HashSet<i64> = HashSet::new();

    for result in stage.results.values() {
        seen_refids.insert(result.refid);
        if !result.is_classified() {
            continue;
        }
        drivers.push(classified_entry(stage, result, leader_time));
    }

    // Registered entrants with no result record did not start.
    for participant in race.participants.values() {
        if seen_refids.contains(&participant.refid) {
            continue;
        }
        seen_refids.insert(participant.refid);
        let participant_id = race.participant_id_for_refid(participant.refid).unwrap_or(0);
        drivers.push(dns_entry(participant, participant_id));
    }

    sort_by_position(&mut drivers);
    apply_intervals(&mut drivers);

    let current_lap = average_lap(&drivers);

    Some(PitWall {
        race_info: RaceInfo {
            track: tracks::track_label(race.setup.track_id),
            current_lap,
            total_laps: race.setup.race_length,
            start_time: format_start_time(race.start_time),
            best_lap: format_time(fastest_time),
            fastest_driver: clean_name(&fastest_driver),
            is_finished: race.finished,
            race_index: race.index,
        },
        drivers,
    })
}

// --- Entry Construction ---

fn classified_entry(
    stage: &RaceStage,
    result: &crate::domain::RaceResult,
    leader_time: i64,
) -> DriverEntry {
    let attrs = &result.attributes;
    let gap = attrs.total_time - leader_time;

    let last_lap = last_lap_event(stage, result.participantid);
    let last_lap_ms = last_lap.map_or(0, |e| e.attributes.lap_time);
    let sector1_ms = last_lap.map_or(0, |e| e.attributes.sector1_time);
    let sector2_ms = last_lap.map_or(0, |e| e.attributes.sector2_time);
    let sector3_ms = last_lap.map_or(0, |e| e.attributes.sector3_time);

    let vehicle = vehicles::vehicle_info(attrs.vehicle_id);

    DriverEntry {
        position: attrs.race_position,
        name: clean_name(&result.name),
        vehicle: vehicle.map_or("Unknown", |v| v.name).to_string(),
        class: vehicle.map_or("Unknown", |v| v.class).to_string(),
        lap: format!("L{}", attrs.lap),
        gap: format_gap(gap),
        interval: String::new(), // filled in after sorting
        best_lap: format_time(attrs.fastest_lap_time),
        last_lap: format_time(last_lap_ms),
        sector1: format_sector(sector1_ms),
        sector2: format_sector(sector2_ms),
        sector3: format_sector(sector3_ms),
        state: attrs.state.clone(),
        is_player: result.is_player,
        participant_id: result.participantid,
        lap_number: attrs.lap,
        best_lap_ms: attrs.fastest_lap_time,
        last_lap_ms,
        sector1_ms,
        sector2_ms,
        sector3_ms,
        total_time_ms: attrs.total_time,
    }
}

fn dns_entry(participant: &Participant, participant_id: i64) -> DriverEntry {
    let vehicle = vehicles::vehicle_info(participant.vehicle_id);

    DriverEntry {
        position: DNS_POSITION,
        name: clean_name(&participant.name),
        vehicle: vehicle.map_or("Unknown", |v| v.name).to_string(),
        class: vehicle.map_or("Unknown", |v| v.class).to_string(),
        lap: "L0".to_string(),
        gap: SECTOR_PLACEHOLDER.to_string(),
        interval: SECTOR_PLACEHOLDER.to_string(),
        best_lap: format_time(0),
        last_lap: format_time(0),
        sector1: SECTOR_PLACEHOLDER.to_string(),
        sector2: SECTOR_PLACEHOLDER.to_string(),
        sector3: SECTOR_PLACEHOLDER.to_string(),
        state: "DNS".to_string(),
        is_player: participant.is_player,
        participant_id,
        lap_number: 0,
        best_lap_ms: 0,
        last_lap_ms: 0,
        sector1_ms: 0,
        sector2_ms: 0,
        sector3_ms: 0,
        total_time_ms: 0,
    }
}

/// Most recent completed lap for a participant; ties broken by the highest
/// event timestamp.
fn last_lap_event(stage: &RaceStage, participant_id: i64) -> Option<&RaceEvent> {
    stage
        .events
        .iter()
        .filter(|e| e.is_lap() && e.participantid == participant_id)
        .max_by_key(|e| e.time)
}

// --- Ordering ---

fn sort_by_position(drivers: &mut [DriverEntry]) {
    drivers.sort_by(|a, b| {
        match (a.position == DNS_POSITION, b.position == DNS_POSITION) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.position.cmp(&b.position),
        }
    });
}

/// Gap to the car immediately ahead, computed on the sorted table.
fn apply_intervals(drivers: &mut [DriverEntry]) {
    let mut previous_total: Option<i64> = None;

    for entry in drivers.iter_mut() {
        if entry.position == DNS_POSITION {
            continue;
        }
        entry.interval = match previous_total {
            None => format_gap(0),
            Some(ahead) => format_gap(entry.total_time_ms - ahead),
        };
        previous_total = Some(entry.total_time_ms);
    }
}

fn overall_fastest_lap(stage: &RaceStage) -> (i64, String) {
    stage
        .results
        .values()
        .filter(|r| r.attributes.fastest_lap_time > 0)
        .min_by_key(|r| r.attributes.fastest_lap_time)
        .map(|r| (r.attributes.fastest_lap_time, r.name.clone()))
        .unwrap_or((0, String::new()))
}

fn average_lap(drivers: &[DriverEntry]) -> i64 {
    if drivers.is_empty() {
        return 0;
    }
    let total: i64 = drivers.iter().map(|d| d.lap_number).sum();
    (total as f64 / drivers.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EventAttributes, RaceResult, RaceSetup, ResultAttributes, StatsDocument,
    };
    use std::collections::{BTreeMap, HashMap};

    fn result(
        participant_id: i64,
        refid: i64,
        name: &str,
        state: &str,
        position: i64,
        total_time: i64,
    ) -> RaceResult {
        RaceResult {
            participantid: participant_id,
            refid,
            name: name.to_string(),
            is_player: false,
            attributes: ResultAttributes {
                state: state.to_string(),
                race_position: position,
                fastest_lap_time: 90_000 + participant_id,
                lap: 10,
                total_time,
                vehicle_id: 0,
            },
        }
    }

    fn participant(refid: i64, name: &str) -> Participant {
        Participant {
            refid,
            name: name.to_string(),
            is_player: false,
            vehicle_id: 0,
        }
    }

    fn race_with(
        results: Vec<RaceResult>,
        participants: Vec<(i64, Participant)>,
        events: Vec<RaceEvent>,
    ) -> RaceHistoryEntry {
        let mut result_map = HashMap::new();
        for r in results {
            result_map.insert(r.participantid.to_string(), r);
        }
        let mut participant_map = BTreeMap::new();
        for (id, p) in participants {
            participant_map.insert(id.to_string(), p);
        }
        let mut stages = HashMap::new();
        stages.insert(
            "race1".to_string(),
            RaceStage {
                results: result_map,
                events,
            },
        );
        RaceHistoryEntry {
            index: 3,
            start_time: 1_700_000_000,
            end_time: 1_700_002_000,
            finished: true,
            setup: RaceSetup {
                track_id: 775712153,
                race_length: 12,
                ..Default::default()
            },
            participants: participant_map,
            stages,
        }
    }

    #[test]
    fn leader_gap_uses_minimum_total_time() {
        // Map iteration order must not matter: the entry with the lowest
        // total time is the baseline even when it is not "first".
        let race = race_with(
            vec![
                result(0, 100, "Second", "Racing", 2, 601_500),
                result(1, 101, "Leader", "Racing", 1, 600_000),
            ],
            vec![
                (0, participant(100, "Second")),
                (1, participant(101, "Leader")),
            ],
            vec![],
        );

        let pit_wall = build_pit_wall(&race).unwrap();
        assert_eq!(pit_wall.drivers[0].gap, "+0.000");
        assert_eq!(pit_wall.drivers[1].gap, "+1.500");
        assert_eq!(pit_wall.drivers[1].interval, "+1.500");
    }

    #[test]
    fn dns_synthesized_once_and_sorted_last() {
        let race = race_with(
            vec![result(0, 100, "Finisher", "Finished", 1, 600_000)],
            vec![
                (0, participant(100, "Finisher")),
                (4, participant(104, " 07 John Doe (AI)")),
            ],
            vec![],
        );

        let pit_wall = build_pit_wall(&race).unwrap();
        assert_eq!(pit_wall.drivers.len(), 2);

        let dns: Vec<_> = pit_wall
            .drivers
            .iter()
            .filter(|d| d.state == "DNS")
            .collect();
        assert_eq!(dns.len(), 1);
        assert_eq!(dns[0].position, DNS_POSITION);
        assert_eq!(dns[0].name, "John Doe");
        assert_eq!(pit_wall.drivers.last().unwrap().state, "DNS");
    }

    #[test]
    fn no_duplicate_entry_for_refid_present_in_results() {
        let race = race_with(
            vec![result(0, 100, "Driver", "Finished", 1, 600_000)],
            vec![(0, participant(100, "Driver"))],
            vec![],
        );

        let pit_wall = build_pit_wall(&race).unwrap();
        assert_eq!(pit_wall.drivers.len(), 1);
        assert_eq!(pit_wall.drivers[0].state, "Finished");
    }

    #[test]
    fn last_lap_comes_from_latest_event() {
        let mut early = RaceEvent {
            event_name: "Lap".to_string(),
            participantid: 0,
            time: 100,
            ..Default::default()
        };
        early.attributes = EventAttributes {
            lap: 9,
            lap_time: 92_000,
            sector1_time: 30_000,
            ..Default::default()
        };
        let mut late = early.clone();
        late.time = 200;
        late.attributes.lap = 10;
        late.attributes.lap_time = 91_000;
        late.attributes.sector1_time = 29_500;

        let race = race_with(
            vec![result(0, 100, "Driver", "Racing", 1, 600_000)],
            vec![(0, participant(100, "Driver"))],
            vec![early, late],
        );

        let pit_wall = build_pit_wall(&race).unwrap();
        assert_eq!(pit_wall.drivers[0].last_lap_ms, 91_000);
        assert_eq!(pit_wall.drivers[0].sector1, "29.500");
    }

    #[test]
    fn retired_results_are_not_rows() {
        let race = race_with(
            vec![
                result(0, 100, "Runner", "Racing", 1, 600_000),
                result(1, 101, "Gone", "Retired", 5, 0),
            ],
            vec![
                (0, participant(100, "Runner")),
                (1, participant(101, "Gone")),
            ],
            vec![],
        );

        let pit_wall = build_pit_wall(&race).unwrap();
        // A retired result is neither classified nor DNS.
        assert_eq!(pit_wall.drivers.len(), 1);
    }

    #[test]
    fn builds_nothing_without_a_race_stage() {
        let mut race = race_with(vec![], vec![], vec![]);
        race.stages.clear();
        assert!(build_pit_wall(&race).is_none());
    }

    #[test]
    fn race_info_summarizes_the_stage() {
        let race = race_with(
            vec![result(0, 100, "55 Fast Guy (AI)", "Finished", 1, 600_000)],
            vec![(0, participant(100, "55 Fast Guy (AI)"))],
            vec![],
        );

        let info = build_pit_wall(&race).unwrap().race_info;
        assert_eq!(info.track, "Spa-Francorchamps");
        assert_eq!(info.total_laps, 12);
        assert!(info.is_finished);
        assert_eq!(info.race_index, 3);
        assert_eq!(info.fastest_driver, "Fast Guy");
    }

    #[test]
    fn snapshot_document_round_trips_into_table() {
        let raw = r#"{"stats": {"history": [{
            "index": 0, "start_time": 1700000000, "end_time": 1700001000, "finished": true,
            "setup": {"TrackId": 775712153, "RaceLength": 8},
            "participants": {"0": {"RefId": 7, "Name": "Solo", "IsPlayer": true, "VehicleId": 0}},
            "stages": {"race1": {"results": {"0": {
                "participantid": 0, "refid": 7, "name": "Solo", "is_player": true,
                "attributes": {"State": "Finished", "RacePosition": 1,
                               "FastestLapTime": 91000, "Lap": 8, "TotalTime": 740000, "VehicleId": 0}
            }}, "events": []}}}]}}"#;
        let document: StatsDocument = serde_json::from_str(raw).unwrap();
        let race = crate::snapshot::current_race(&document).unwrap();
        let pit_wall = build_pit_wall(race).unwrap();
        assert_eq!(pit_wall.drivers.len(), 1);
        assert!(pit_wall.drivers[0].is_player);
        assert_eq!(pit_wall.drivers[0].best_lap, "1:31.000");
    }
}
