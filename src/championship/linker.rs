use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;

use super::points::points_for_position;
use crate::database::ParticipantRecord;
use crate::mapper::{map_participants, MatchKind, RaceFinisher, ReferencePilot};
use crate::pitwall::DNS_POSITION;
use crate::storage::{NewRosterEntry, Storage};

const DNS_STATUS: &str = "DNS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// First race of the championship; its grid founded the roster.
    Bootstrapped { pilots: usize },
    /// Mapped onto an existing roster.
    Mapped { results: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    NotLinked,
    Unlinked,
    /// The unlinked race founded the roster; roster and every result of the
    /// championship went with it.
    RosterCleared,
}

/// Attaches saved races to championship events and carries points across.
pub struct RaceLinker {
    storage: Arc<dyn Storage>,
}

impl RaceLinker {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn link(&self, race_id: i64, event_id: i64) -> Result<LinkOutcome> {
        self.link_with_rng(race_id, event_id, &mut rand::thread_rng())
    }

    /// [`link`](Self::link) with a caller-supplied randomness source for the
    /// replacement shuffle.
    pub fn link_with_rng<R: Rng>(
        &self,
        race_id: i64,
        event_id: i64,
        rng: &mut R,
    ) -> Result<LinkOutcome> {
        let event = self
            .storage
            .event(event_id)?
            .with_context(|| format!("Event {event_id} not found"))?;
        self.storage
            .race(race_id)?
            .with_context(|| format!("Race {race_id} not found"))?;

        let participants = self.storage.race_participants(race_id)?;
        let roster = self.storage.roster(event.championship_id)?;

        // Replace, never merge: a re-link must not keep rows from whatever
        // race was scored here before.
        self.storage.delete_event_results(event_id)?;

        let outcome = if roster.is_empty() {
            self.bootstrap_roster(event.championship_id, event_id, &participants)?
        } else {
            self.map_onto_roster(event.championship_id, event_id, &participants, rng)?
        };

        self.storage.link_race(race_id, event_id)?;
        self.storage.set_event_status(event_id, "finished")?;
        info!("Linked race {race_id} to event {event_id}: {outcome:?}");
        Ok(outcome)
    }

    pub fn unlink(&self, race_id: i64) -> Result<UnlinkOutcome> {
        let race = self
            .storage
            .race(race_id)?
            .with_context(|| format!("Race {race_id} not found"))?;
        let Some(event_id) = race.event_id else {
            return Ok(UnlinkOutcome::NotLinked);
        };
        let event = self
            .storage
            .event(event_id)?
            .with_context(|| format!("Event {event_id} not found"))?;

        self.storage.delete_event_results(event_id)?;

        let roster = self.storage.roster(event.championship_id)?;
        let founded_here = roster
            .iter()
            .any(|entry| entry.source_event_id == Some(event_id));

        let outcome = if founded_here {
            // Every later race was mapped relative to this roster, so those
            // results are meaningless without it.
            self.storage
                .delete_championship_results(event.championship_id)?;
            self.storage.delete_roster(event.championship_id)?;
            warn!(
                "Race {race_id} founded the roster of championship {}; roster and all results cleared",
                event.championship_id
            );
            UnlinkOutcome::RosterCleared
        } else {
            UnlinkOutcome::Unlinked
        };

        self.storage.unlink_race(race_id)?;
        self.storage.set_event_status(event_id, "upcoming")?;
        Ok(outcome)
    }

    /// The first linked race: its full grid becomes the roster verbatim.
    fn bootstrap_roster(
        &self,
        championship_id: i64,
        event_id: i64,
        participants: &[ParticipantRecord],
    ) -> Result<LinkOutcome> {
        let mut entries = Vec::new();

        for (idx, participant) in participants.iter().enumerate() {
            let pilot = self
                .storage
                .find_or_create_pilot(&participant.name, participant.is_player)?;
            self.storage
                .add_championship_participant(championship_id, pilot.id)?;
            entries.push(NewRosterEntry {
                pilot_id: pilot.id,
                roster_position: idx as i64 + 1,
            });
            self.upsert_participant_result(event_id, pilot.id, participant)?;
        }

        self.storage
            .create_roster(championship_id, event_id, &entries)?;

        Ok(LinkOutcome::Bootstrapped {
            pilots: entries.len(),
        })
    }

    fn map_onto_roster<R: Rng>(
        &self,
        championship_id: i64,
        event_id: i64,
        participants: &[ParticipantRecord],
        rng: &mut R,
    ) -> Result<LinkOutcome> {
        let roster = self.storage.roster(championship_id)?;
        let mut results_written = 0;
        let mut next_roster_position = roster.len() as i64 + 1;

        // Humans keep their own name across races.
        let mut seen_humans: HashSet<&str> = HashSet::new();
        for participant in participants.iter().filter(|p| p.is_player) {
            if !seen_humans.insert(participant.name.as_str()) {
                warn!(
                    "Two human drivers share the name '{}'; keeping the first result only",
                    participant.name
                );
                continue;
            }
            let pilot = self
                .storage
                .find_or_create_pilot(&participant.name, true)?;
            self.storage
                .add_championship_participant(championship_id, pilot.id)?;
            if !roster.iter().any(|r| r.pilot_id == pilot.id) {
                self.storage
                    .extend_roster(championship_id, pilot.id, next_roster_position)?;
                next_roster_position += 1;
            }
            self.upsert_participant_result(event_id, pilot.id, participant)?;
            results_written += 1;
        }

        // Roster humans who never appeared in this race did not start.
        let present_names: HashSet<&str> =
            participants.iter().map(|p| p.name.as_str()).collect();
        for entry in roster.iter().filter(|r| r.is_human) {
            if !present_names.contains(entry.pilot_name.as_str()) {
                self.storage.upsert_result(
                    event_id,
                    entry.pilot_id,
                    DNS_POSITION,
                    0,
                    DNS_STATUS,
                )?;
                results_written += 1;
            }
        }

        let reference: Vec<ReferencePilot> = roster
            .iter()
            .filter(|r| !r.is_human)
            .map(|r| ReferencePilot {
                pilot_id: r.pilot_id,
                name: r.pilot_name.clone(),
            })
            .collect();
        let finishers: Vec<RaceFinisher> = participants
            .iter()
            .filter(|p| !p.is_player && p.position != DNS_POSITION)
            .map(|p| RaceFinisher {
                name: p.name.clone(),
                position: p.position,
                points: points_for_position(p.position),
                is_human: false,
            })
            .collect();

        for mapping in map_participants(&reference, &finishers, rng) {
            let pilot_id = match mapping.match_kind {
                MatchKind::ExactMatch | MatchKind::Replacement => mapping
                    .mapped_pilot_id
                    .context("Mapped result without a pilot id")?,
                MatchKind::NewPilot => {
                    let pilot = self
                        .storage
                        .find_or_create_pilot(&mapping.original_name, false)?;
                    self.storage
                        .add_championship_participant(championship_id, pilot.id)?;
                    self.storage.extend_roster(
                        championship_id,
                        pilot.id,
                        next_roster_position,
                    )?;
                    next_roster_position += 1;
                    pilot.id
                }
            };

            self.storage.upsert_result(
                event_id,
                pilot_id,
                mapping.position,
                mapping.points,
                "Finished",
            )?;
            results_written += 1;
        }

        Ok(LinkOutcome::Mapped {
            results: results_written,
        })
    }

    fn upsert_participant_result(
        &self,
        event_id: i64,
        pilot_id: i64,
        participant: &ParticipantRecord,
    ) -> Result<()> {
        let (points, status) = if participant.position == DNS_POSITION {
            (0, DNS_STATUS)
        } else {
            (points_for_position(participant.position), participant.state.as_str())
        };

        self.storage
            .upsert_result(event_id, pilot_id, participant.position, points, status)
    }
}
