use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::ResultRecord;

pub fn upsert(
    conn: &Connection,
    event_id: i64,
    pilot_id: i64,
    position: i64,
    points: i64,
    status: &str,
) -> Result<()> {
    let sql = "INSERT INTO results (event_id, pilot_id, position, points, status) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT (event_id, pilot_id) DO UPDATE \
         SET position = excluded.position, points = excluded.points, status = excluded.status";

    conn.execute(sql, params![event_id, pilot_id, position, points, status])
        .context("Failed to upsert result")?;

    Ok(())
}

pub fn list_for_event(conn: &Connection, event_id: i64) -> Result<Vec<ResultRecord>> {
    let sql = "SELECT pilot_id, position, points, status FROM results \
         WHERE event_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![event_id], |row| {
            Ok(ResultRecord {
                pilot_id: row.get(0)?,
                position: row.get(1)?,
                points: row.get(2)?,
                status: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_for_event(conn: &Connection, event_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM results WHERE event_id = ?1", params![event_id])
        .context("Failed to delete event results")
}

pub fn delete_for_championship(conn: &Connection, championship_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM results WHERE event_id IN \
         (SELECT id FROM events WHERE championship_id = ?1)",
        params![championship_id],
    )
    .context("Failed to delete championship results")
}
