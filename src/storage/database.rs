//! SQLite history store using rusqlite.
//!
//! Alternative backend to the YAML files. Workout exercises are kept as a
//! JSON column; snapshots map to one row per exercise.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use thiserror::Error;

use super::history::{HistoryStore, StoreError, StreakSnapshot, WeightSnapshot};
use super::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE, STREAKS_SNAPSHOT, WEIGHTS_SNAPSHOT};
use crate::program::{Weight, WorkoutGroup};
use crate::training::types::{ExerciseRecord, WorkoutRecord};

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "liftlog.db";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// History store backed by a SQLite database.
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let store = Self { conn };
        store.initialize()?;

        tracing::debug!("Opened database at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let store = Self { conn };
        store.initialize()?;

        Ok(store)
    }

    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.schema_version()?;
        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    fn snapshot_saved(&self, name: &str) -> Result<bool, DatabaseError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM snapshots WHERE name = ?1)",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    fn read_weights(&self) -> Result<Option<WeightSnapshot>, DatabaseError> {
        if !self.snapshot_saved(WEIGHTS_SNAPSHOT)? {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT exercise, weight, bodyweight FROM current_weights")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(WeightRow {
                    exercise: row.get(0)?,
                    weight: row.get(1)?,
                    bodyweight: row.get(2)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut weights = WeightSnapshot::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            let (exercise, weight) = row.into_entry()?;
            weights.insert(exercise, weight);
        }
        Ok(Some(weights))
    }

    fn write_weights(&mut self, weights: &WeightSnapshot) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute("DELETE FROM current_weights", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        for (exercise, weight) in weights {
            tx.execute(
                "INSERT INTO current_weights (exercise, weight, bodyweight) VALUES (?1, ?2, ?3)",
                params![exercise, weight.value(), weight.is_bodyweight() as i32],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        }
        mark_snapshot(&tx, WEIGHTS_SNAPSHOT)?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    fn read_streaks(&self) -> Result<Option<StreakSnapshot>, DatabaseError> {
        if !self.snapshot_saved(STREAKS_SNAPSHOT)? {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT exercise, streak FROM failure_streaks")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut streaks = StreakSnapshot::new();
        for row in rows {
            let (exercise, streak) = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            streaks.insert(exercise, streak);
        }
        Ok(Some(streaks))
    }

    fn write_streaks(&mut self, streaks: &StreakSnapshot) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute("DELETE FROM failure_streaks", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        for (exercise, streak) in streaks {
            tx.execute(
                "INSERT INTO failure_streaks (exercise, streak) VALUES (?1, ?2)",
                params![exercise, streak],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        }
        mark_snapshot(&tx, STREAKS_SNAPSHOT)?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    fn insert_workout(&self, record: &WorkoutRecord) -> Result<(), DatabaseError> {
        let exercises_json = serde_json::to_string(&record.exercises)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO workouts (date, time, workout, exercises_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.date.format(DATE_FORMAT).to_string(),
                    record.time.format(TIME_FORMAT).to_string(),
                    record.workout.label(),
                    exercises_json,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn get_workout(&self, date: NaiveDate) -> Result<Option<WorkoutRecord>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT date, time, workout, exercises_json FROM workouts WHERE date = ?1",
                params![date.format(DATE_FORMAT).to_string()],
                |row| {
                    Ok(WorkoutRow {
                        date: row.get(0)?,
                        time: row.get(1)?,
                        workout: row.get(2)?,
                        exercises_json: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(WorkoutRow::into_record).transpose()
    }

    fn list_dates(&self) -> Result<Vec<NaiveDate>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM workouts ORDER BY date")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut dates = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) => dates.push(date),
                Err(e) => tracing::warn!("Ignoring workout row with bad date '{}': {}", raw, e),
            }
        }
        Ok(dates)
    }

    fn workout_exists(&self, date: NaiveDate) -> Result<bool, DatabaseError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM workouts WHERE date = ?1)",
                params![date.format(DATE_FORMAT).to_string()],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }
}

fn mark_snapshot(tx: &rusqlite::Transaction<'_>, name: &str) -> Result<(), DatabaseError> {
    tx.execute(
        "INSERT OR REPLACE INTO snapshots (name, saved_at) VALUES (?1, ?2)",
        params![name, Utc::now().to_rfc3339()],
    )
    .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    Ok(())
}

impl HistoryStore for SqliteHistoryStore {
    fn load_weights(&self) -> Result<Option<WeightSnapshot>, StoreError> {
        self.read_weights().map_err(|e| e.on_read("current weights"))
    }

    fn save_weights(&mut self, weights: &WeightSnapshot) -> Result<(), StoreError> {
        self.write_weights(weights)
            .map_err(|e| e.on_write("current weights"))
    }

    fn load_streaks(&self) -> Result<Option<StreakSnapshot>, StoreError> {
        self.read_streaks().map_err(|e| e.on_read("failure streaks"))
    }

    fn save_streaks(&mut self, streaks: &StreakSnapshot) -> Result<(), StoreError> {
        self.write_streaks(streaks)
            .map_err(|e| e.on_write("failure streaks"))
    }

    fn save_workout(&mut self, record: &WorkoutRecord) -> Result<(), StoreError> {
        self.insert_workout(record)
            .map_err(|e| e.on_write(&format!("workout {}", record.date)))
    }

    fn load_workout(&self, date: NaiveDate) -> Result<Option<WorkoutRecord>, StoreError> {
        self.get_workout(date)
            .map_err(|e| e.on_read(&format!("workout {}", date)))
    }

    fn workout_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        self.list_dates().map_err(|e| e.on_read("workout dates"))
    }

    fn has_workout_on(&self, date: NaiveDate) -> Result<bool, StoreError> {
        self.workout_exists(date)
            .map_err(|e| e.on_read(&format!("workout {}", date)))
    }
}

/// Intermediate struct for reading weight rows from database.
struct WeightRow {
    exercise: String,
    weight: Option<f64>,
    bodyweight: i32,
}

impl WeightRow {
    fn into_entry(self) -> Result<(String, Weight), DatabaseError> {
        let weight = match (self.bodyweight != 0, self.weight) {
            (true, _) => Weight::Bodyweight,
            (false, Some(value)) => Weight::Numeric(value),
            (false, None) => {
                return Err(DatabaseError::DeserializationError(format!(
                    "Missing weight for '{}'",
                    self.exercise
                )))
            }
        };
        Ok((self.exercise, weight))
    }
}

/// Intermediate struct for reading workout rows from database.
struct WorkoutRow {
    date: String,
    time: String,
    workout: String,
    exercises_json: String,
}

impl WorkoutRow {
    fn into_record(self) -> Result<WorkoutRecord, DatabaseError> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid date: {}", e)))?;

        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid time: {}", e)))?;

        let workout = WorkoutGroup::from_label(&self.workout).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown workout '{}'", self.workout))
        })?;

        let exercises: std::collections::BTreeMap<String, ExerciseRecord> =
            serde_json::from_str(&self.exercises_json)
                .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(WorkoutRecord {
            date,
            time,
            workout,
            exercises,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl DatabaseError {
    fn on_read(self, what: &str) -> StoreError {
        StoreError::ReadFailed {
            what: what.to_string(),
            reason: self.to_string(),
        }
    }

    fn on_write(self, what: &str) -> StoreError {
        StoreError::WriteFailed {
            what: what.to_string(),
            reason: self.to_string(),
        }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(e: DatabaseError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}
