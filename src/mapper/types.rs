use serde::Serialize;

/// Established championship identity from the roster.
#[derive(Debug, Clone)]
pub struct ReferencePilot {
    pub pilot_id: i64,
    pub name: String,
}

/// One finisher of the race being linked, already name-cleaned.
#[derive(Debug, Clone)]
pub struct RaceFinisher {
    pub name: String,
    pub position: i64,
    pub points: i64,
    pub is_human: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchKind {
    /// Same cleaned name appears in the roster.
    ExactMatch,
    /// Assigned to a roster identity absent from this race.
    Replacement,
    /// No roster identity left; the caller must create one.
    NewPilot,
}

/// Assignment of one AI finisher to a championship identity.
#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub original_name: String,
    pub mapped_pilot_id: Option<i64>,
    pub mapped_pilot_name: String,
    pub position: i64,
    pub points: i64,
    pub is_human: bool,
    pub match_kind: MatchKind,
}
