use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn insert(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "INSERT INTO championships (name) VALUES (?1) RETURNING id",
        params![name],
        |row| row.get(0),
    )
    .context("Failed to insert championship")
}

pub fn insert_event(conn: &Connection, championship_id: i64, name: &str) -> Result<i64> {
    conn.query_row(
        "INSERT INTO events (championship_id, name) VALUES (?1, ?2) RETURNING id",
        params![championship_id, name],
        |row| row.get(0),
    )
    .context("Failed to insert event")
}
