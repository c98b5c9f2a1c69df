//! History store interface.
//!
//! The training core depends only on this trait: snapshots of current weights
//! and failure streaks, per-date workout records, and the date queries the
//! session guards need.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::program::Weight;
use crate::training::schedule::week_start;
use crate::training::types::WorkoutRecord;

/// Current weight per exercise.
pub type WeightSnapshot = BTreeMap<String, Weight>;

/// Failure streak per exercise.
pub type StreakSnapshot = BTreeMap<String, u32>;

/// One entry of a history listing; unreadable records are reported, not fatal.
#[derive(Debug)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub record: Result<WorkoutRecord, StoreError>,
}

/// Durable storage for engine state and workout records.
pub trait HistoryStore {
    /// Load the weights snapshot. `Ok(None)` when none was saved yet.
    fn load_weights(&self) -> Result<Option<WeightSnapshot>, StoreError>;

    /// Overwrite the weights snapshot.
    fn save_weights(&mut self, weights: &WeightSnapshot) -> Result<(), StoreError>;

    /// Load the streaks snapshot. `Ok(None)` when none was saved yet.
    fn load_streaks(&self) -> Result<Option<StreakSnapshot>, StoreError>;

    /// Overwrite the streaks snapshot.
    fn save_streaks(&mut self, streaks: &StreakSnapshot) -> Result<(), StoreError>;

    /// Store the record for its date.
    fn save_workout(&mut self, record: &WorkoutRecord) -> Result<(), StoreError>;

    /// Load the record stored for a date.
    fn load_workout(&self, date: NaiveDate) -> Result<Option<WorkoutRecord>, StoreError>;

    /// Dates that have a stored record, ascending.
    fn workout_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;

    /// Check whether a record exists for a date.
    fn has_workout_on(&self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.workout_dates()?.contains(&date))
    }

    /// Count records from Monday of `date`'s week up to and including `date`.
    fn count_workouts_in_week(&self, date: NaiveDate) -> Result<usize, StoreError> {
        let start = week_start(date);
        let mut count = 0;
        let mut day = start;
        while day <= date {
            if self.has_workout_on(day)? {
                count += 1;
            }
            day += Duration::days(1);
        }
        Ok(count)
    }

    /// Most recent records first, at most `limit`.
    fn recent_workouts(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut dates = self.workout_dates()?;
        dates.reverse();

        let mut entries = Vec::new();
        for date in dates.into_iter().take(limit) {
            match self.load_workout(date) {
                Ok(Some(record)) => entries.push(HistoryEntry {
                    date,
                    record: Ok(record),
                }),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping workout record for {}: {}", date, e);
                    entries.push(HistoryEntry {
                        date,
                        record: Err(e),
                    });
                }
            }
        }
        Ok(entries)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    weights: Option<WeightSnapshot>,
    streaks: Option<StreakSnapshot>,
    workouts: BTreeMap<NaiveDate, WorkoutRecord>,
    fail_writes: bool,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Toggle write failures.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self, what: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed {
                what: what.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load_weights(&self) -> Result<Option<WeightSnapshot>, StoreError> {
        Ok(self.weights.clone())
    }

    fn save_weights(&mut self, weights: &WeightSnapshot) -> Result<(), StoreError> {
        self.check_writable("current weights")?;
        self.weights = Some(weights.clone());
        Ok(())
    }

    fn load_streaks(&self) -> Result<Option<StreakSnapshot>, StoreError> {
        Ok(self.streaks.clone())
    }

    fn save_streaks(&mut self, streaks: &StreakSnapshot) -> Result<(), StoreError> {
        self.check_writable("failure streaks")?;
        self.streaks = Some(streaks.clone());
        Ok(())
    }

    fn save_workout(&mut self, record: &WorkoutRecord) -> Result<(), StoreError> {
        self.check_writable(&format!("workout {}", record.date))?;
        self.workouts.insert(record.date, record.clone());
        Ok(())
    }

    fn load_workout(&self, date: NaiveDate) -> Result<Option<WorkoutRecord>, StoreError> {
        Ok(self.workouts.get(&date).cloned())
    }

    fn workout_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self.workouts.keys().copied().collect())
    }

    fn has_workout_on(&self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.workouts.contains_key(&date))
    }
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A snapshot or record exists but cannot be read
    #[error("Could not read {what}: {reason}")]
    ReadFailed { what: String, reason: String },

    /// A snapshot or record could not be written; the change is unsaved
    #[error("Could not write {what}: {reason}")]
    WriteFailed { what: String, reason: String },

    /// The backing store could not be opened
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_read_error(&self) -> bool {
        matches!(self, StoreError::ReadFailed { .. })
    }

    pub fn is_write_error(&self) -> bool {
        matches!(self, StoreError::WriteFailed { .. })
    }
}
