use serde::Serialize;

use crate::domain::RaceStage;

/// One completed lap for one driver, extracted from the stage event log.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedLap {
    pub lap: i64,
    pub lap_time: i64,
    pub sector1: i64,
    pub sector2: i64,
    pub sector3: i64,
    pub position: i64,
    pub distance: f64,
}

/// All laps for one participant, ordered by lap number.
pub fn laps_for(stage: &RaceStage, participant_id: i64) -> Vec<CompletedLap> {
    let mut laps: Vec<CompletedLap> = stage
        .events
        .iter()
        .filter(|e| e.is_lap() && e.participantid == participant_id)
        .map(|e| CompletedLap {
            lap: e.attributes.lap,
            lap_time: e.attributes.lap_time,
            sector1: e.attributes.sector1_time,
            sector2: e.attributes.sector2_time,
            sector3: e.attributes.sector3_time,
            position: e.attributes.race_position,
            distance: e.attributes.distance_travelled,
        })
        .collect();

    laps.sort_by_key(|lap| lap.lap);
    laps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventAttributes, RaceEvent};

    fn lap_event(participant_id: i64, lap: i64, time: i64) -> RaceEvent {
        RaceEvent {
            event_name: "Lap".to_string(),
            participantid: participant_id,
            time,
            attributes: EventAttributes {
                lap,
                lap_time: 90_000 + lap,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn filters_by_participant_and_sorts_by_lap() {
        let stage = RaceStage {
            events: vec![
                lap_event(2, 2, 30),
                lap_event(1, 1, 10),
                lap_event(2, 1, 20),
            ],
            ..Default::default()
        };

        let laps = laps_for(&stage, 2);
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[0].lap, 1);
        assert_eq!(laps[1].lap, 2);
    }
}
