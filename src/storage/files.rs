//! YAML file store.
//!
//! Layout under the data directory:
//! - `current_weights.yaml`
//! - `failure_streaks.yaml`
//! - `workouts/YYYY_MM_DD.yaml`, one per session
//!
//! Every write overwrites the whole file.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::history::{HistoryStore, StoreError, StreakSnapshot, WeightSnapshot};
use crate::training::types::{date_key, parse_date_key, WorkoutRecord};

const WEIGHTS_FILE: &str = "current_weights.yaml";
const STREAKS_FILE: &str = "failure_streaks.yaml";
const WORKOUTS_DIR: &str = "workouts";
const RECORD_EXTENSION: &str = "yaml";

/// History store backed by YAML files.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    root: PathBuf,
}

impl FileHistoryStore {
    /// Open a store rooted at `root`, creating the directories if needed.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let workouts = root.join(WORKOUTS_DIR);
        std::fs::create_dir_all(&workouts).map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", workouts.display(), e))
        })?;

        tracing::debug!("Opened file store at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for a date.
    pub fn workout_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join(WORKOUTS_DIR)
            .join(format!("{}.{}", date_key(date), RECORD_EXTENSION))
    }

    fn read_yaml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Option<T>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }

        let read_failed = |reason: String| StoreError::ReadFailed {
            what: what.to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| read_failed(e.to_string()))?;
        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| read_failed(e.to_string()))
    }

    fn write_yaml<T: Serialize>(path: &Path, what: &str, value: &T) -> Result<(), StoreError> {
        let write_failed = |reason: String| StoreError::WriteFailed {
            what: what.to_string(),
            reason,
        };
        let content = serde_yaml::to_string(value).map_err(|e| write_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_failed(e.to_string()))?;

        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn load_weights(&self) -> Result<Option<WeightSnapshot>, StoreError> {
        Self::read_yaml(&self.root.join(WEIGHTS_FILE), "current weights")
    }

    fn save_weights(&mut self, weights: &WeightSnapshot) -> Result<(), StoreError> {
        Self::write_yaml(&self.root.join(WEIGHTS_FILE), "current weights", weights)
    }

    fn load_streaks(&self) -> Result<Option<StreakSnapshot>, StoreError> {
        Self::read_yaml(&self.root.join(STREAKS_FILE), "failure streaks")
    }

    fn save_streaks(&mut self, streaks: &StreakSnapshot) -> Result<(), StoreError> {
        Self::write_yaml(&self.root.join(STREAKS_FILE), "failure streaks", streaks)
    }

    fn save_workout(&mut self, record: &WorkoutRecord) -> Result<(), StoreError> {
        let path = self.workout_path(record.date);
        Self::write_yaml(&path, &format!("workout {}", record.date_key()), record)
    }

    fn load_workout(&self, date: NaiveDate) -> Result<Option<WorkoutRecord>, StoreError> {
        Self::read_yaml(&self.workout_path(date), &format!("workout {}", date_key(date)))
    }

    fn workout_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let dir = self.root.join(WORKOUTS_DIR);
        let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::ReadFailed {
            what: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION))
            .filter_map(|path| {
                let date = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(parse_date_key);
                if date.is_none() {
                    tracing::warn!("Skipping {}: not a dated workout record", path.display());
                }
                date
            })
            .collect();
        dates.sort();
        Ok(dates)
    }

    fn has_workout_on(&self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.workout_path(date).exists())
    }
}
