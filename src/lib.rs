pub mod autosaver;
pub mod championship;
pub mod cli;
pub mod constants;
pub mod database;
pub mod domain;
pub mod errors;
pub mod mapper;
pub mod pitwall;
pub mod snapshot;
pub mod status;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use autosaver::{AutoSaver, SMS_STATS_PATH_KEY};
use championship::RaceLinker;
use cli::Cli;
use pitwall::{build_pit_wall, format_time, PitWall};
use snapshot::{current_race, read_snapshot};
use status::{StatusClient, StatusPage, SERVER_URL_KEY};
use storage::{SqliteStorage, Storage};

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn open_storage(database_path: &str) -> Result<Arc<dyn Storage>> {
    Ok(Arc::new(SqliteStorage::open(database_path)?))
}

pub async fn handle_monitor(storage: Arc<dyn Storage>) -> Result<()> {
    let saver = AutoSaver::new(storage);
    saver.start();
    info!("Race monitor running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for Ctrl-C")?;
    saver.stop();
    info!("Race monitor stopped");
    Ok(())
}

pub fn handle_set_path(storage: &dyn Storage, path: &str) -> Result<()> {
    storage.set_setting(SMS_STATS_PATH_KEY, path)?;
    println!("Stats file path set to {path}");
    Ok(())
}

pub fn handle_set_server(storage: &dyn Storage, url: &str) -> Result<()> {
    storage.set_setting(SERVER_URL_KEY, url)?;
    println!("Server URL set to {url}");
    Ok(())
}

pub fn handle_pitwall(storage: &dyn Storage) -> Result<()> {
    let path = storage
        .setting(SMS_STATS_PATH_KEY)?
        .context("No stats file path configured, run set-path first")?;
    let document = read_snapshot(std::path::Path::new(&path))
        .with_context(|| format!("Failed to read stats file at {path}"))?;
    let race = current_race(&document).context("No race in the stats file yet")?;
    let pit_wall = build_pit_wall(race).context("Most recent session has no race stage")?;

    print_pit_wall(&pit_wall);
    Ok(())
}

pub async fn handle_live(storage: &dyn Storage) -> Result<()> {
    let url = storage
        .setting(SERVER_URL_KEY)?
        .context("No server URL configured, run set-server first")?;
    let client = StatusClient::new(&url)?;
    let page = client.fetch_live_status().await;

    print_live_status(&page);
    Ok(())
}

pub fn handle_races(storage: &dyn Storage, limit: i64) -> Result<()> {
    let races = storage.recent_races(limit)?;
    if races.is_empty() {
        println!("No saved races");
        return Ok(());
    }

    println!(
        "{:>4}  {:<24} {:>5} {:>8} {:<20} {:>7}",
        "id", "track", "laps", "drivers", "winner", "event"
    );
    for race in races {
        println!(
            "{:>4}  {:<24} {:>5} {:>8} {:<20} {:>7}",
            race.id,
            race.track_name,
            race.total_laps,
            race.total_drivers,
            race.winner_name,
            race.event_id.map_or("-".to_string(), |id| id.to_string()),
        );
    }
    Ok(())
}

pub fn handle_link(storage: Arc<dyn Storage>, race_id: i64, event_id: i64) -> Result<()> {
    let outcome = RaceLinker::new(storage).link(race_id, event_id)?;
    println!("Linked race {race_id} to event {event_id}: {outcome:?}");
    Ok(())
}

pub fn handle_unlink(storage: Arc<dyn Storage>, race_id: i64) -> Result<()> {
    let outcome = RaceLinker::new(storage).unlink(race_id)?;
    println!("Unlinked race {race_id}: {outcome:?}");
    Ok(())
}

fn print_pit_wall(pit_wall: &PitWall) {
    let info = &pit_wall.race_info;
    println!(
        "{} | lap {}/{} | started {} | fastest {} ({})",
        info.track,
        info.current_lap,
        info.total_laps,
        info.start_time,
        info.best_lap,
        if info.fastest_driver.is_empty() { "-" } else { &info.fastest_driver },
    );

    println!(
        "{:>4} {:<22} {:<26} {:>5} {:>9} {:>9} {:>9} {:>9} {:<8}",
        "pos", "driver", "vehicle", "lap", "gap", "interval", "best", "last", "state"
    );
    for driver in &pit_wall.drivers {
        let position = if driver.state == "DNS" {
            "DNS".to_string()
        } else {
            driver.position.to_string()
        };
        println!(
            "{:>4} {:<22} {:<26} {:>5} {:>9} {:>9} {:>9} {:>9} {:<8}",
            position,
            driver.name,
            driver.vehicle,
            driver.lap,
            driver.gap,
            driver.interval,
            driver.best_lap,
            driver.last_lap,
            driver.state,
        );
    }
}

fn print_live_status(page: &StatusPage) {
    let session = &page.session;
    let track = session.track_name.as_deref().unwrap_or("Unknown track");
    println!(
        "{} | {} / {} | track {}°C, air {}°C",
        track,
        session.session_state,
        session.session_stage,
        session.track_temperature.unwrap_or(0.0),
        session.ambient_temperature.unwrap_or(0.0),
    );

    if page.participants.is_empty() {
        println!("No participants on track");
        return;
    }

    println!(
        "{:>4} {:<22} {:>5} {:>9} {:>9} {:<10}",
        "pos", "driver", "lap", "last", "best", "state"
    );
    for participant in &page.participants {
        println!(
            "{:>4} {:<22} {:>5} {:>9} {:>9} {:<10}",
            participant.race_position,
            participant.name,
            participant.current_lap,
            format_time(participant.last_lap_time),
            format_time(participant.fastest_lap_time),
            participant.state,
        );
    }
}
