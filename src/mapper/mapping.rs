use std::collections::HashSet;

use rand::Rng;

use super::shuffle::fisher_yates;
use super::types::{MappingResult, MatchKind, RaceFinisher, ReferencePilot};

/// Assign every AI finisher of the current race to a championship identity.
///
/// Human finishers are matched by name during linking and never pass through
/// here, so the output has exactly one entry per AI finisher. Identities that
/// are on the roster but absent from this race form a replacement pool; the
/// pool is shuffled because the upstream server itself names the stand-in AI
/// drivers pseudo-randomly, so no fixed assignment order would be more right
/// than another.
pub fn map_participants<R: Rng>(
    reference: &[ReferencePilot],
    finishers: &[RaceFinisher],
    rng: &mut R,
) -> Vec<MappingResult> {
    let present_names: HashSet<&str> = finishers.iter().map(|f| f.name.as_str()).collect();

    let mut used_pilot_ids: HashSet<i64> = HashSet::new();
    let mut matched_indices: HashSet<usize> = HashSet::new();
    let mut results = Vec::new();

    // Exact names keep their identity regardless of pool state. Matches are
    // tracked by finisher index, so duplicate names still map one each.
    for (idx, finisher) in finishers.iter().enumerate().filter(|(_, f)| !f.is_human) {
        let exact = reference
            .iter()
            .find(|r| r.name == finisher.name && !used_pilot_ids.contains(&r.pilot_id));
        if let Some(pilot) = exact {
            used_pilot_ids.insert(pilot.pilot_id);
            matched_indices.insert(idx);
            results.push(MappingResult {
                original_name: finisher.name.clone(),
                mapped_pilot_id: Some(pilot.pilot_id),
                mapped_pilot_name: pilot.name.clone(),
                position: finisher.position,
                points: finisher.points,
                is_human: false,
                match_kind: MatchKind::ExactMatch,
            });
        }
    }

    let mut absence_pool: Vec<&ReferencePilot> = reference
        .iter()
        .filter(|r| !used_pilot_ids.contains(&r.pilot_id) && !present_names.contains(r.name.as_str()))
        .collect();
    fisher_yates(&mut absence_pool, rng);
    let mut pool = absence_pool.into_iter();

    for (idx, finisher) in finishers.iter().enumerate().filter(|(_, f)| !f.is_human) {
        if matched_indices.contains(&idx) {
            continue;
        }
        match pool.next() {
            Some(pilot) => results.push(MappingResult {
                original_name: finisher.name.clone(),
                mapped_pilot_id: Some(pilot.pilot_id),
                mapped_pilot_name: pilot.name.clone(),
                position: finisher.position,
                points: finisher.points,
                is_human: false,
                match_kind: MatchKind::Replacement,
            }),
            None => results.push(MappingResult {
                original_name: finisher.name.clone(),
                mapped_pilot_id: None,
                mapped_pilot_name: finisher.name.clone(),
                position: finisher.position,
                points: finisher.points,
                is_human: false,
                match_kind: MatchKind::NewPilot,
            }),
        }
    }

    results
}
