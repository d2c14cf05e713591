use anyhow::{Context, Result};

use crate::database::{
    self, connection, setup, DbPool, EventRecord, LapRecord, ParticipantRecord, Pilot,
    RaceRecord, ResultRecord, RosterEntry,
};
use crate::domain::RaceKey;

/// Roster entry to be written, before the database assigns row ids.
#[derive(Debug, Clone)]
pub struct NewRosterEntry {
    pub pilot_id: i64,
    pub roster_position: i64,
}

/// Persistence surface the monitor and the championship linker write through.
///
/// One implementation, selected at startup. The trait exists so service
/// objects take `Arc<dyn Storage>` instead of a concrete pool.
pub trait Storage: Send + Sync {
    fn find_race_by_key(&self, key: RaceKey) -> Result<Option<i64>>;
    /// Write race, participants and laps in one transaction.
    fn persist_race(
        &self,
        race: &RaceRecord,
        participants: &[ParticipantRecord],
        laps: &[LapRecord],
    ) -> Result<i64>;
    fn race(&self, race_id: i64) -> Result<Option<RaceRecord>>;
    fn recent_races(&self, limit: i64) -> Result<Vec<RaceRecord>>;
    fn race_participants(&self, race_id: i64) -> Result<Vec<ParticipantRecord>>;
    fn race_laps(&self, race_id: i64) -> Result<Vec<LapRecord>>;

    fn setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;

    fn create_championship(&self, name: &str) -> Result<i64>;
    fn create_event(&self, championship_id: i64, name: &str) -> Result<i64>;
    fn event(&self, event_id: i64) -> Result<Option<EventRecord>>;
    fn set_event_status(&self, event_id: i64, status: &str) -> Result<()>;
    fn find_or_create_pilot(&self, name: &str, is_human: bool) -> Result<Pilot>;
    fn add_championship_participant(&self, championship_id: i64, pilot_id: i64) -> Result<()>;

    fn roster(&self, championship_id: i64) -> Result<Vec<RosterEntry>>;
    /// Create the reference roster atomically, recording which event founded it.
    fn create_roster(
        &self,
        championship_id: i64,
        source_event_id: i64,
        entries: &[NewRosterEntry],
    ) -> Result<()>;
    fn extend_roster(
        &self,
        championship_id: i64,
        pilot_id: i64,
        roster_position: i64,
    ) -> Result<()>;
    fn delete_roster(&self, championship_id: i64) -> Result<()>;

    fn upsert_result(
        &self,
        event_id: i64,
        pilot_id: i64,
        position: i64,
        points: i64,
        status: &str,
    ) -> Result<()>;
    fn event_results(&self, event_id: i64) -> Result<Vec<ResultRecord>>;
    fn delete_event_results(&self, event_id: i64) -> Result<()>;
    fn delete_championship_results(&self, championship_id: i64) -> Result<()>;

    fn link_race(&self, race_id: i64, event_id: i64) -> Result<()>;
    fn unlink_race(&self, race_id: i64) -> Result<()>;
}

pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    pub fn open(database_path: &str) -> Result<Self> {
        let pool = connection::create_pool(database_path)?;
        let conn = pool.get().context("Failed to get database connection")?;
        setup::initialize_schema(&conn)?;
        drop(conn);

        Ok(Self { pool })
    }

    pub fn open_in_memory() -> Result<Self> {
        let pool = connection::create_memory_pool()?;
        let conn = pool.get().context("Failed to get database connection")?;
        setup::initialize_schema(&conn)?;
        drop(conn);

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<database::DbConn> {
        self.pool.get().context("Failed to get database connection")
    }
}

impl Storage for SqliteStorage {
    fn find_race_by_key(&self, key: RaceKey) -> Result<Option<i64>> {
        let conn = self.conn()?;
        database::races::find_by_key(&conn, key)
    }

    fn persist_race(
        &self,
        race: &RaceRecord,
        participants: &[ParticipantRecord],
        laps: &[LapRecord],
    ) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .context("Failed to start race transaction")?;

        let race_id = database::races::insert(&tx, race)?;
        for participant in participants {
            database::race_participants::insert(&tx, race_id, participant)?;
        }
        for lap in laps {
            database::race_laps::insert(&tx, race_id, lap)?;
        }

        tx.commit().context("Failed to commit race transaction")?;
        Ok(race_id)
    }

    fn race(&self, race_id: i64) -> Result<Option<RaceRecord>> {
        let conn = self.conn()?;
        database::races::find_by_id(&conn, race_id)
    }

    fn recent_races(&self, limit: i64) -> Result<Vec<RaceRecord>> {
        let conn = self.conn()?;
        database::races::list_recent(&conn, limit)
    }

    fn race_participants(&self, race_id: i64) -> Result<Vec<ParticipantRecord>> {
        let conn = self.conn()?;
        database::race_participants::list_for_race(&conn, race_id)
    }

    fn race_laps(&self, race_id: i64) -> Result<Vec<LapRecord>> {
        let conn = self.conn()?;
        database::race_laps::list_for_race(&conn, race_id)
    }

    fn setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        database::settings::get(&conn, key)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        database::settings::set(&conn, key, value)
    }

    fn create_championship(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        database::championships::insert(&conn, name)
    }

    fn create_event(&self, championship_id: i64, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        database::championships::insert_event(&conn, championship_id, name)
    }

    fn event(&self, event_id: i64) -> Result<Option<EventRecord>> {
        let conn = self.conn()?;
        database::events::find_by_id(&conn, event_id)
    }

    fn set_event_status(&self, event_id: i64, status: &str) -> Result<()> {
        let conn = self.conn()?;
        database::events::set_status(&conn, event_id, status)
    }

    fn find_or_create_pilot(&self, name: &str, is_human: bool) -> Result<Pilot> {
        let conn = self.conn()?;
        database::pilots::find_or_create(&conn, name, is_human)
    }

    fn add_championship_participant(&self, championship_id: i64, pilot_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::events::add_participant(&conn, championship_id, pilot_id)
    }

    fn roster(&self, championship_id: i64) -> Result<Vec<RosterEntry>> {
        let conn = self.conn()?;
        database::roster::list_for_championship(&conn, championship_id)
    }

    fn create_roster(
        &self,
        championship_id: i64,
        source_event_id: i64,
        entries: &[NewRosterEntry],
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .context("Failed to start roster transaction")?;

        for entry in entries {
            database::roster::insert_entry(
                &tx,
                championship_id,
                entry.pilot_id,
                entry.roster_position,
                true,
                Some(source_event_id),
            )?;
        }

        tx.commit().context("Failed to commit roster transaction")
    }

    fn extend_roster(
        &self,
        championship_id: i64,
        pilot_id: i64,
        roster_position: i64,
    ) -> Result<()> {
        let conn = self.conn()?;
        database::roster::insert_entry(&conn, championship_id, pilot_id, roster_position, false, None)
    }

    fn delete_roster(&self, championship_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::roster::delete_for_championship(&conn, championship_id).map(|_| ())
    }

    fn upsert_result(
        &self,
        event_id: i64,
        pilot_id: i64,
        position: i64,
        points: i64,
        status: &str,
    ) -> Result<()> {
        let conn = self.conn()?;
        database::results::upsert(&conn, event_id, pilot_id, position, points, status)
    }

    fn event_results(&self, event_id: i64) -> Result<Vec<ResultRecord>> {
        let conn = self.conn()?;
        database::results::list_for_event(&conn, event_id)
    }

    fn delete_event_results(&self, event_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::results::delete_for_event(&conn, event_id).map(|_| ())
    }

    fn delete_championship_results(&self, championship_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::results::delete_for_championship(&conn, championship_id).map(|_| ())
    }

    fn link_race(&self, race_id: i64, event_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::races::set_event(&conn, race_id, Some(event_id))
    }

    fn unlink_race(&self, race_id: i64) -> Result<()> {
        let conn = self.conn()?;
        database::races::set_event(&conn, race_id, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_race(index: i64, start_time: i64) -> RaceRecord {
        RaceRecord {
            id: 0,
            race_index: index,
            track_name: "Spa-Francorchamps".to_string(),
            track_id: 775712153,
            start_time,
            end_time: start_time + 1800,
            duration: 1800,
            total_laps: 10,
            total_drivers: 2,
            winner_name: "Winner".to_string(),
            winner_time: 600_000,
            fastest_lap_driver: "Winner".to_string(),
            fastest_lap_time: 91_000,
            total_collisions: 1,
            summary_json: "{}".to_string(),
            event_id: None,
        }
    }

    #[test]
    fn persisted_race_is_found_by_key() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let race = sample_race(4, 1_700_000_000);

        let key = RaceKey {
            index: 4,
            start_time: 1_700_000_000,
        };
        assert!(storage.find_race_by_key(key).unwrap().is_none());

        let race_id = storage.persist_race(&race, &[], &[]).unwrap();
        assert_eq!(storage.find_race_by_key(key).unwrap(), Some(race_id));
    }

    #[test]
    fn persist_writes_participants_and_laps_atomically() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let participants = vec![ParticipantRecord {
            participant_id: 0,
            ref_id: 100,
            name: "Winner".to_string(),
            is_player: false,
            vehicle_id: 0,
            vehicle_name: "Unknown".to_string(),
            vehicle_class: "Unknown".to_string(),
            position: 1,
            fastest_lap_time: 91_000,
            total_time: 600_000,
            state: "Finished".to_string(),
            lap_count: 10,
        }];
        let laps = vec![LapRecord {
            participant_id: 0,
            lap_number: 1,
            lap_time: 92_000,
            sector1_time: 30_000,
            sector2_time: 31_000,
            sector3_time: 31_000,
            position: 1,
            distance: 7004.0,
        }];

        let race_id = storage
            .persist_race(&sample_race(1, 10), &participants, &laps)
            .unwrap();

        assert_eq!(storage.race_participants(race_id).unwrap().len(), 1);
        assert_eq!(storage.race_laps(race_id).unwrap().len(), 1);
    }

    #[test]
    fn settings_round_trip_and_overwrite() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.setting("sms_stats_path").unwrap().is_none());

        storage.set_setting("sms_stats_path", "/tmp/stats.json").unwrap();
        storage.set_setting("sms_stats_path", "/srv/stats.json").unwrap();
        assert_eq!(
            storage.setting("sms_stats_path").unwrap().as_deref(),
            Some("/srv/stats.json")
        );
    }

    #[test]
    fn duplicate_race_key_is_rejected() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.persist_race(&sample_race(2, 50), &[], &[]).unwrap();
        assert!(storage.persist_race(&sample_race(2, 50), &[], &[]).is_err());
    }

    #[test]
    fn event_results_lists_what_upsert_wrote() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let championship_id = storage.create_championship("Cup").unwrap();
        let event_id = storage.create_event(championship_id, "Round 1").unwrap();
        let pilot = storage.find_or_create_pilot("Tarquini", false).unwrap();

        storage.upsert_result(event_id, pilot.id, 1, 25, "Finished").unwrap();
        let results = storage.event_results(event_id).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pilot_id, pilot.id);
        assert_eq!(results[0].points, 25);
    }
}
