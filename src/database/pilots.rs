use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Pilot;

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Pilot>> {
    conn.query_row(
        "SELECT id, name, is_human FROM pilots WHERE name = ?1",
        params![name],
        parse_pilot_row,
    )
    .optional()
    .context("Failed to look up pilot by name")
}

pub fn insert(conn: &Connection, name: &str, is_human: bool) -> Result<Pilot> {
    conn.query_row(
        "INSERT INTO pilots (name, is_human) VALUES (?1, ?2) RETURNING id, name, is_human",
        params![name, is_human],
        parse_pilot_row,
    )
    .context("Failed to insert pilot")
}

pub fn find_or_create(conn: &Connection, name: &str, is_human: bool) -> Result<Pilot> {
    match find_by_name(conn, name)? {
        Some(pilot) => Ok(pilot),
        None => insert(conn, name, is_human),
    }
}

fn parse_pilot_row(row: &rusqlite::Row) -> rusqlite::Result<Pilot> {
    Ok(Pilot {
        id: row.get(0)?,
        name: row.get(1)?,
        is_human: row.get(2)?,
    })
}
