use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::ParticipantRecord;

pub fn insert(conn: &Connection, race_id: i64, participant: &ParticipantRecord) -> Result<()> {
    let sql = "INSERT INTO race_participants (race_id, participant_id, ref_id, name, \
         is_player, vehicle_id, vehicle_name, vehicle_class, position, fastest_lap_time, \
         total_time, state, lap_count) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

    conn.execute(
        sql,
        params![
            race_id,
            participant.participant_id,
            participant.ref_id,
            participant.name,
            participant.is_player,
            participant.vehicle_id,
            participant.vehicle_name,
            participant.vehicle_class,
            participant.position,
            participant.fastest_lap_time,
            participant.total_time,
            participant.state,
            participant.lap_count,
        ],
    )
    .context("Failed to insert race participant")?;

    Ok(())
}

pub fn list_for_race(conn: &Connection, race_id: i64) -> Result<Vec<ParticipantRecord>> {
    let sql = "SELECT participant_id, ref_id, name, is_player, vehicle_id, vehicle_name, \
         vehicle_class, position, fastest_lap_time, total_time, state, lap_count \
         FROM race_participants WHERE race_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![race_id], parse_participant_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_participant_row(row: &rusqlite::Row) -> rusqlite::Result<ParticipantRecord> {
    Ok(ParticipantRecord {
        participant_id: row.get(0)?,
        ref_id: row.get(1)?,
        name: row.get(2)?,
        is_player: row.get(3)?,
        vehicle_id: row.get(4)?,
        vehicle_name: row.get(5)?,
        vehicle_class: row.get(6)?,
        position: row.get(7)?,
        fastest_lap_time: row.get(8)?,
        total_time: row.get(9)?,
        state: row.get(10)?,
        lap_count: row.get(11)?,
    })
}
