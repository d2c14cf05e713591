use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::EventRecord;

pub fn find_by_id(conn: &Connection, event_id: i64) -> Result<Option<EventRecord>> {
    conn.query_row(
        "SELECT id, championship_id, name, status FROM events WHERE id = ?1",
        params![event_id],
        |row| {
            Ok(EventRecord {
                id: row.get(0)?,
                championship_id: row.get(1)?,
                name: row.get(2)?,
                status: row.get(3)?,
            })
        },
    )
    .optional()
    .context("Failed to look up event")
}

pub fn set_status(conn: &Connection, event_id: i64, status: &str) -> Result<()> {
    conn.execute(
        "UPDATE events SET status = ?2 WHERE id = ?1",
        params![event_id, status],
    )
    .context("Failed to update event status")?;

    Ok(())
}

pub fn add_participant(conn: &Connection, championship_id: i64, pilot_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO championship_participants (championship_id, pilot_id) \
         VALUES (?1, ?2)",
        params![championship_id, pilot_id],
    )
    .context("Failed to register championship participant")?;

    Ok(())
}
