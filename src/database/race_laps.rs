use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::LapRecord;

pub fn insert(conn: &Connection, race_id: i64, lap: &LapRecord) -> Result<()> {
    let sql = "INSERT INTO race_laps (race_id, participant_id, lap_number, lap_time, \
         sector1_time, sector2_time, sector3_time, position, distance) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

    conn.execute(
        sql,
        params![
            race_id,
            lap.participant_id,
            lap.lap_number,
            lap.lap_time,
            lap.sector1_time,
            lap.sector2_time,
            lap.sector3_time,
            lap.position,
            lap.distance,
        ],
    )
    .context("Failed to insert race lap")?;

    Ok(())
}

pub fn list_for_race(conn: &Connection, race_id: i64) -> Result<Vec<LapRecord>> {
    let sql = "SELECT participant_id, lap_number, lap_time, sector1_time, sector2_time, \
         sector3_time, position, distance \
         FROM race_laps WHERE race_id = ?1 ORDER BY participant_id, lap_number";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![race_id], |row| {
            Ok(LapRecord {
                participant_id: row.get(0)?,
                lap_number: row.get(1)?,
                lap_time: row.get(2)?,
                sector1_time: row.get(3)?,
                sector2_time: row.get(4)?,
                sector3_time: row.get(5)?,
                position: row.get(6)?,
                distance: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
