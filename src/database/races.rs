use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::RaceRecord;
use crate::domain::RaceKey;

const RACE_COLUMNS: &str = "id, race_index, track_name, track_id, start_time, end_time, \
     duration, total_laps, total_drivers, winner_name, winner_time, fastest_lap_driver, \
     fastest_lap_time, total_collisions, summary_json, event_id";

pub fn insert(conn: &Connection, race: &RaceRecord) -> Result<i64> {
    let sql = "INSERT INTO race_history (race_index, track_name, track_id, start_time, \
         end_time, duration, total_laps, total_drivers, winner_name, winner_time, \
         fastest_lap_driver, fastest_lap_time, total_collisions, summary_json) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) RETURNING id";

    conn.query_row(
        sql,
        params![
            race.race_index,
            race.track_name,
            race.track_id,
            race.start_time,
            race.end_time,
            race.duration,
            race.total_laps,
            race.total_drivers,
            race.winner_name,
            race.winner_time,
            race.fastest_lap_driver,
            race.fastest_lap_time,
            race.total_collisions,
            race.summary_json,
        ],
        |row| row.get(0),
    )
    .context("Failed to insert race")
}

pub fn find_by_key(conn: &Connection, key: RaceKey) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM race_history WHERE race_index = ?1 AND start_time = ?2",
        params![key.index, key.start_time],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to look up race by key")
}

pub fn find_by_id(conn: &Connection, race_id: i64) -> Result<Option<RaceRecord>> {
    let sql = format!("SELECT {RACE_COLUMNS} FROM race_history WHERE id = ?1");
    conn.query_row(&sql, params![race_id], parse_race_row)
        .optional()
        .context("Failed to look up race by id")
}

pub fn list_recent(conn: &Connection, limit: i64) -> Result<Vec<RaceRecord>> {
    let sql = format!("SELECT {RACE_COLUMNS} FROM race_history ORDER BY start_time DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit], parse_race_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_event(conn: &Connection, race_id: i64, event_id: Option<i64>) -> Result<()> {
    conn.execute(
        "UPDATE race_history SET event_id = ?2 WHERE id = ?1",
        params![race_id, event_id],
    )
    .context("Failed to update race event link")?;

    Ok(())
}

fn parse_race_row(row: &rusqlite::Row) -> rusqlite::Result<RaceRecord> {
    Ok(RaceRecord {
        id: row.get(0)?,
        race_index: row.get(1)?,
        track_name: row.get(2)?,
        track_id: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        duration: row.get(6)?,
        total_laps: row.get(7)?,
        total_drivers: row.get(8)?,
        winner_name: row.get(9)?,
        winner_time: row.get(10)?,
        fastest_lap_driver: row.get(11)?,
        fastest_lap_time: row.get(12)?,
        total_collisions: row.get(13)?,
        summary_json: row.get(14)?,
        event_id: row.get(15)?,
    })
}
