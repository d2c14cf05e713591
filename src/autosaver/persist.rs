use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::json;

use crate::constants::{tracks, vehicles};
use crate::database::{LapRecord, ParticipantRecord, RaceRecord};
use crate::domain::{RaceHistoryEntry, RaceStage};
use crate::pitwall::clean_name;
use crate::snapshot::laps_for;

/// Impact events grouped by participant id.
pub fn collision_counts(stage: &RaceStage) -> HashMap<i64, i64> {
    let mut counts = HashMap::new();
    for event in stage.events.iter().filter(|e| e.is_impact()) {
        *counts.entry(event.participantid).or_insert(0) += 1;
    }
    counts
}

/// Everything one finished race persists: the summary row, one participant
/// row per result (plus DNS rows for entrants with no result), and the full
/// lap log.
pub fn build_race_record(
    race: &RaceHistoryEntry,
) -> Result<(RaceRecord, Vec<ParticipantRecord>, Vec<LapRecord>)> {
    let stage = race.race_stage().context("Race has no race stage")?;
    let collisions = collision_counts(stage);

    let mut participants = Vec::new();
    let mut laps = Vec::new();
    let mut seen_refids = std::collections::HashSet::new();

    let mut ordered: Vec<_> = stage.results.values().collect();
    ordered.sort_by_key(|r| r.attributes.race_position);

    for result in &ordered {
        seen_refids.insert(result.refid);
        let vehicle = vehicles::vehicle_info(result.attributes.vehicle_id);
        participants.push(ParticipantRecord {
            participant_id: result.participantid,
            ref_id: result.refid,
            name: clean_name(&result.name),
            is_player: result.is_player,
            vehicle_id: result.attributes.vehicle_id,
            vehicle_name: vehicle.map_or("Unknown", |v| v.name).to_string(),
            vehicle_class: vehicle.map_or("Unknown", |v| v.class).to_string(),
            position: result.attributes.race_position,
            fastest_lap_time: result.attributes.fastest_lap_time,
            total_time: result.attributes.total_time,
            state: result.attributes.state.clone(),
            lap_count: result.attributes.lap,
        });

        for lap in laps_for(stage, result.participantid) {
            laps.push(LapRecord {
                participant_id: result.participantid,
                lap_number: lap.lap,
                lap_time: lap.lap_time,
                sector1_time: lap.sector1,
                sector2_time: lap.sector2,
                sector3_time: lap.sector3,
                position: lap.position,
                distance: lap.distance,
            });
        }
    }

    for (key, participant) in &race.participants {
        if seen_refids.contains(&participant.refid) {
            continue;
        }
        seen_refids.insert(participant.refid);
        let vehicle = vehicles::vehicle_info(participant.vehicle_id);
        participants.push(ParticipantRecord {
            participant_id: key.parse().unwrap_or(-1),
            ref_id: participant.refid,
            name: clean_name(&participant.name),
            is_player: participant.is_player,
            vehicle_id: participant.vehicle_id,
            vehicle_name: vehicle.map_or("Unknown", |v| v.name).to_string(),
            vehicle_class: vehicle.map_or("Unknown", |v| v.class).to_string(),
            position: 999,
            fastest_lap_time: 0,
            total_time: 0,
            state: "DNS".to_string(),
            lap_count: 0,
        });
    }

    // Some result sets carry no position 1 at all (mid-race disconnects);
    // the race is still worth keeping, with a placeholder winner.
    let (winner_name, winner_time) = participants
        .iter()
        .find(|p| p.position == 1)
        .map(|p| (p.name.clone(), p.total_time))
        .unwrap_or_else(|| ("N/A".to_string(), 0));

    let (fastest_lap_driver, fastest_lap_time) = participants
        .iter()
        .filter(|p| p.fastest_lap_time > 0)
        .min_by_key(|p| p.fastest_lap_time)
        .map(|p| (p.name.clone(), p.fastest_lap_time))
        .unwrap_or_default();

    let total_laps = participants.iter().map(|p| p.lap_count).max().unwrap_or(0);
    let total_collisions: i64 = collisions.values().sum();
    let track_name = tracks::track_label(race.setup.track_id);

    let summary = json!({
        "raceIndex": race.index,
        "trackName": track_name,
        "trackId": race.setup.track_id,
        "startTime": race.start_time,
        "endTime": race.end_time,
        "totalLaps": total_laps,
        "drivers": participants.iter().map(|p| json!({
            "name": p.name,
            "position": p.position,
            "vehicle": p.vehicle_name,
            "class": p.vehicle_class,
            "bestLap": p.fastest_lap_time,
            "totalTime": p.total_time,
            "state": p.state,
            "collisions": collisions.get(&p.participant_id).copied().unwrap_or(0),
        })).collect::<Vec<_>>(),
    });

    let record = RaceRecord {
        id: 0,
        race_index: race.index,
        track_name,
        track_id: race.setup.track_id,
        start_time: race.start_time,
        end_time: race.end_time,
        duration: (race.end_time - race.start_time).max(0),
        total_laps,
        total_drivers: stage.results.len() as i64,
        winner_name,
        winner_time,
        fastest_lap_driver,
        fastest_lap_time,
        total_collisions,
        summary_json: serde_json::to_string(&summary)
            .context("Failed to serialize race summary")?,
        event_id: None,
    };

    Ok((record, participants, laps))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::domain::{
        EventAttributes, Participant, RaceEvent, RaceResult, RaceSetup, ResultAttributes,
    };

    fn impact(participant_id: i64) -> RaceEvent {
        RaceEvent {
            event_name: "Impact".to_string(),
            participantid: participant_id,
            ..Default::default()
        }
    }

    fn lap(participant_id: i64, lap: i64) -> RaceEvent {
        RaceEvent {
            event_name: "Lap".to_string(),
            participantid: participant_id,
            time: lap,
            attributes: EventAttributes {
                lap,
                lap_time: 90_000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn result(participant_id: i64, refid: i64, name: &str, position: i64) -> RaceResult {
        RaceResult {
            participantid: participant_id,
            refid,
            name: name.to_string(),
            is_player: false,
            attributes: ResultAttributes {
                state: "Finished".to_string(),
                race_position: position,
                fastest_lap_time: 90_000 + position,
                lap: 8,
                total_time: 700_000 + position,
                vehicle_id: 0,
            },
        }
    }

    fn sample_race() -> RaceHistoryEntry {
        let mut results = HashMap::new();
        results.insert("0".to_string(), result(0, 100, " 31 Winner (AI)", 1));
        results.insert("1".to_string(), result(1, 101, "Runner Up", 2));

        let mut participants = BTreeMap::new();
        for (key, refid, name) in [("0", 100, "Winner"), ("1", 101, "Runner Up"), ("2", 102, "No Show")] {
            participants.insert(
                key.to_string(),
                Participant {
                    refid,
                    name: name.to_string(),
                    is_player: false,
                    vehicle_id: 0,
                },
            );
        }

        let mut stages = HashMap::new();
        stages.insert(
            "race1".to_string(),
            RaceStage {
                results,
                events: vec![impact(0), impact(0), impact(1), lap(0, 1), lap(0, 2)],
            },
        );

        RaceHistoryEntry {
            index: 2,
            start_time: 1_700_000_000,
            end_time: 1_700_001_234,
            finished: true,
            setup: RaceSetup {
                track_id: 775712153,
                race_length: 8,
                ..Default::default()
            },
            participants,
            stages,
        }
    }

    #[test]
    fn collisions_group_by_participant() {
        let race = sample_race();
        let counts = collision_counts(race.race_stage().unwrap());
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), Some(&1));
    }

    #[test]
    fn record_summarizes_winner_and_fastest_lap() {
        let (record, participants, laps) = build_race_record(&sample_race()).unwrap();

        assert_eq!(record.winner_name, "Winner");
        assert_eq!(record.fastest_lap_driver, "Winner");
        assert_eq!(record.fastest_lap_time, 90_001);
        assert_eq!(record.total_collisions, 3);
        assert_eq!(record.total_drivers, 2);
        assert_eq!(record.track_name, "Spa-Francorchamps");
        assert_eq!(record.duration, 1_234);

        // 2 finishers + 1 DNS.
        assert_eq!(participants.len(), 3);
        assert_eq!(participants[2].state, "DNS");
        assert_eq!(laps.len(), 2);
    }

    #[test]
    fn missing_first_place_falls_back_to_placeholder_winner() {
        let mut race = sample_race();
        let stage = race.stages.get_mut("race1").unwrap();
        for (offset, result) in stage.results.values_mut().enumerate() {
            result.attributes.race_position = 2 + offset as i64;
        }

        let (record, _, _) = build_race_record(&race).unwrap();
        assert_eq!(record.winner_name, "N/A");
        assert_eq!(record.winner_time, 0);
    }

    #[test]
    fn names_are_cleaned_before_persisting() {
        let (_, participants, _) = build_race_record(&sample_race()).unwrap();
        assert!(participants.iter().any(|p| p.name == "Winner"));
        assert!(!participants.iter().any(|p| p.name.contains("(AI)")));
    }
}
