mod checker;
mod persist;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::time::interval;

pub use checker::{completion_check, SkipReason, MIN_DRIVERS, MIN_RACE_LAPS};
pub use persist::{build_race_record, collision_counts};

use crate::domain::RaceKey;
use crate::snapshot::{current_race, read_snapshot};
use crate::storage::Storage;

/// Settings key holding the path of the server stats file.
pub const SMS_STATS_PATH_KEY: &str = "sms_stats_path";

const POLL_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Not started, or stopped.
    Idle,
    /// Started but no stats path configured yet.
    ConfigPending,
    /// Watching the stats file.
    Polling,
}

/// Polls the stats file and persists each finished race exactly once.
///
/// Construct once, then `start` to schedule polling. `restart` after the
/// stats path setting changes; the next tick re-reads it.
pub struct AutoSaver {
    worker: Arc<Worker>,
    stop_tx: watch::Sender<bool>,
}

struct Worker {
    storage: Arc<dyn Storage>,
    checking: AtomicBool,
    stats_path: Mutex<Option<PathBuf>>,
    last_seen: Mutex<Option<RaceKey>>,
    state: Mutex<MonitorState>,
}

impl AutoSaver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            worker: Arc::new(Worker {
                storage,
                checking: AtomicBool::new(false),
                stats_path: Mutex::new(None),
                last_seen: Mutex::new(None),
                state: Mutex::new(MonitorState::Idle),
            }),
            stop_tx,
        }
    }

    /// Schedule the poll loop on the current runtime.
    pub fn start(&self) {
        self.worker.set_state(MonitorState::ConfigPending);
        let worker = Arc::clone(&self.worker);
        let mut stop_rx = self.stop_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(POLL_INTERVAL_SECS));
            loop {
                tokio::select! {
                    _ = ticker.tick() => worker.tick(),
                    _ = stop_rx.changed() => break,
                }
            }
            worker.set_state(MonitorState::Idle);
        });
    }

    /// Stop scheduling new ticks. A tick already in flight finishes.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Forget the cached stats path so the next tick picks up a changed
    /// setting.
    pub fn restart(&self) {
        let mut path = self.worker.stats_path.lock().expect("path lock");
        *path = None;
        self.worker.set_state(MonitorState::ConfigPending);
        info!("Race monitor restarted, waiting for stats path");
    }

    pub fn state(&self) -> MonitorState {
        *self.worker.state.lock().expect("state lock")
    }

    /// Run one poll cycle immediately, outside the schedule.
    pub fn tick_once(&self) {
        self.worker.tick();
    }
}

impl Worker {
    fn set_state(&self, state: MonitorState) {
        *self.state.lock().expect("state lock") = state;
    }

    /// One poll cycle. Skipped entirely while a previous cycle is in flight.
    fn tick(&self) {
        if self.checking.swap(true, Ordering::SeqCst) {
            debug!("Previous check still running, skipping tick");
            return;
        }

        if let Err(err) = self.run_check() {
            warn!("Race check failed: {err:#}");
        }

        self.checking.store(false, Ordering::SeqCst);
    }

    fn run_check(&self) -> Result<()> {
        let Some(path) = self.resolve_stats_path()? else {
            return Ok(());
        };

        // The server rewrites the file in place; read failures and partial
        // content are transient, the next tick sees a fresh copy.
        let document = match read_snapshot(&path) {
            Ok(document) => document,
            Err(err) => {
                debug!("Stats file {} not ready: {err}", path.display());
                return Ok(());
            }
        };

        let Some(race) = current_race(&document) else {
            return Ok(());
        };

        let key = race.race_key();
        if *self.last_seen.lock().expect("key lock") == Some(key) {
            return Ok(());
        }

        if let Err(reason) = completion_check(race) {
            debug!("Race {key} not ready: {reason}");
            return Ok(());
        }

        if self.storage.find_race_by_key(key)?.is_some() {
            debug!("Race {key} already saved");
            self.mark_seen(key);
            return Ok(());
        }

        let (record, participants, laps) = build_race_record(race)?;
        let race_id = self.storage.persist_race(&record, &participants, &laps)?;
        info!(
            "Saved race {key} at {} with {} drivers (id {race_id})",
            record.track_name,
            participants.len()
        );

        // Only after the write, so a storage failure is retried next tick.
        self.mark_seen(key);
        Ok(())
    }

    fn resolve_stats_path(&self) -> Result<Option<PathBuf>> {
        let mut cached = self.stats_path.lock().expect("path lock");
        if cached.is_some() {
            return Ok(cached.clone());
        }

        match self.storage.setting(SMS_STATS_PATH_KEY)? {
            Some(value) => {
                info!("Watching stats file at {value}");
                *cached = Some(PathBuf::from(value));
                self.set_state(MonitorState::Polling);
                Ok(cached.clone())
            }
            None => Ok(None),
        }
    }

    fn mark_seen(&self, key: RaceKey) {
        *self.last_seen.lock().expect("key lock") = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::storage::SqliteStorage;

    fn snapshot_with_laps(max_lap: i64) -> String {
        let body = json!({"stats": {"history": [{
            "index": 1,
            "start_time": 1_700_000_000,
            "end_time": 1_700_001_000,
            "finished": true,
            "setup": {"TrackId": 775712153, "RaceLength": 10},
            "participants": {
                "0": {"RefId": 100, "Name": "First", "IsPlayer": false, "VehicleId": 0},
                "1": {"RefId": 101, "Name": "Second", "IsPlayer": false, "VehicleId": 0}
            },
            "stages": {"race1": {"results": {
                "0": {"participantid": 0, "refid": 100, "name": "First", "is_player": false,
                      "attributes": {"State": "Finished", "RacePosition": 1,
                                     "FastestLapTime": 91_000, "Lap": max_lap,
                                     "TotalTime": 700_000, "VehicleId": 0}},
                "1": {"participantid": 1, "refid": 101, "name": "Second", "is_player": false,
                      "attributes": {"State": "Finished", "RacePosition": 2,
                                     "FastestLapTime": 92_000, "Lap": max_lap,
                                     "TotalTime": 701_000, "VehicleId": 0}}
            }, "events": []}}
        }]}});
        format!("// stats build 123\n{body}")
    }

    fn write_stats(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gt3-keeper-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn saver_with_path(storage: &Arc<SqliteStorage>, path: &PathBuf) -> AutoSaver {
        storage
            .set_setting(SMS_STATS_PATH_KEY, path.to_str().unwrap())
            .unwrap();
        AutoSaver::new(Arc::clone(storage) as Arc<dyn Storage>)
    }

    #[test]
    fn finished_race_is_persisted_once() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let path = write_stats("once", &snapshot_with_laps(8));
        let saver = saver_with_path(&storage, &path);

        saver.tick_once();
        saver.tick_once();

        // A fresh monitor over the same storage hits the duplicate check.
        let second = AutoSaver::new(Arc::clone(&storage) as Arc<dyn Storage>);
        second.tick_once();

        assert_eq!(storage.recent_races(10).unwrap().len(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn lap_threshold_boundary() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());

        let short = write_stats("short", &snapshot_with_laps(5));
        saver_with_path(&storage, &short).tick_once();
        assert!(storage.recent_races(10).unwrap().is_empty());

        let long = write_stats("long", &snapshot_with_laps(6));
        saver_with_path(&storage, &long).tick_once();
        assert_eq!(storage.recent_races(10).unwrap().len(), 1);

        std::fs::remove_file(short).ok();
        std::fs::remove_file(long).ok();
    }

    #[test]
    fn unconfigured_monitor_is_a_no_op() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let saver = AutoSaver::new(Arc::clone(&storage) as Arc<dyn Storage>);

        saver.tick_once();
        assert!(storage.recent_races(10).unwrap().is_empty());
    }

    #[test]
    fn persisted_race_carries_participants_and_laps() {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        let path = write_stats("rows", &snapshot_with_laps(8));
        saver_with_path(&storage, &path).tick_once();

        let races = storage.recent_races(1).unwrap();
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].track_name, "Spa-Francorchamps");
        assert_eq!(storage.race_participants(races[0].id).unwrap().len(), 2);

        std::fs::remove_file(path).ok();
    }
}
