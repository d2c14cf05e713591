use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::RosterEntry;

pub fn list_for_championship(conn: &Connection, championship_id: i64) -> Result<Vec<RosterEntry>> {
    let sql = "SELECT r.pilot_id, p.name, p.is_human, r.roster_position, r.is_reference, \
         r.source_event_id \
         FROM championship_roster r JOIN pilots p ON p.id = r.pilot_id \
         WHERE r.championship_id = ?1 ORDER BY r.roster_position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![championship_id], |row| {
            Ok(RosterEntry {
                pilot_id: row.get(0)?,
                pilot_name: row.get(1)?,
                is_human: row.get(2)?,
                roster_position: row.get(3)?,
                is_reference: row.get(4)?,
                source_event_id: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn insert_entry(
    conn: &Connection,
    championship_id: i64,
    pilot_id: i64,
    roster_position: i64,
    is_reference: bool,
    source_event_id: Option<i64>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO championship_roster \
         (championship_id, pilot_id, roster_position, is_reference, source_event_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![championship_id, pilot_id, roster_position, is_reference, source_event_id],
    )
    .context("Failed to insert roster entry")?;

    Ok(())
}

pub fn delete_for_championship(conn: &Connection, championship_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM championship_roster WHERE championship_id = ?1",
        params![championship_id],
    )
    .context("Failed to delete championship roster")
}
