//! Training session types.
//!
//! Defines ExerciseState, SetOutcome, ExerciseRecord and WorkoutRecord
//! Defines SetTransition and the inputs exchanged with the presentation layer
//! Defines TrainingError and SessionAborted

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::program::{ExerciseSpec, Weight, WorkoutGroup};
use crate::storage::StoreError;

/// Format used for per-date record keys.
pub const DATE_KEY_FORMAT: &str = "%Y_%m_%d";

/// Mutable progression state of one exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseState {
    /// Prescribed working weight for the next block
    pub current_weight: Weight,
    /// Consecutive failed sets
    pub failure_streak: u32,
}

impl ExerciseState {
    /// State on first run.
    pub fn initial(spec: &ExerciseSpec) -> Self {
        Self {
            current_weight: spec.starting_weight,
            failure_streak: 0,
        }
    }
}

/// One recorded working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOutcome {
    /// 1-based set index
    pub set: u32,
    /// Load entered for the set
    pub weight: Weight,
    pub target_reps: u32,
    pub actual_reps: u32,
    /// `actual_reps < target_reps`
    pub failed: bool,
    /// New prescribed weight when this set triggered a deload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deloaded_to: Option<Weight>,
}

impl SetOutcome {
    /// Create an outcome; `failed` is derived from the rep counts.
    pub fn new(set: u32, weight: Weight, target_reps: u32, actual_reps: u32) -> Self {
        Self {
            set,
            weight,
            target_reps,
            actual_reps,
            failed: actual_reps < target_reps,
            deloaded_to: None,
        }
    }
}

/// All working sets of one exercise in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Working weight prescribed when the block started
    pub weight: Weight,
    pub sets: Vec<SetOutcome>,
    /// Block ran to completion
    pub completed: bool,
}

impl ExerciseRecord {
    /// Check whether any set in the block failed.
    pub fn any_failed(&self) -> bool {
        self.sets.iter().any(|set| set.failed)
    }
}

/// Immutable record of one training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub workout: WorkoutGroup,
    /// Exercise records keyed by name
    pub exercises: BTreeMap<String, ExerciseRecord>,
}

impl WorkoutRecord {
    /// Storage key for the record's date (`YYYY_MM_DD`).
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    /// Check whether every exercise block ran to completion.
    pub fn is_complete(&self) -> bool {
        self.exercises.values().all(|record| record.completed)
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }
}

/// Storage key for a calendar date (`YYYY_MM_DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a storage key back into a date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Result of feeding one set into the progression engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetTransition {
    /// Target met; `streak_cleared` tells whether a running streak was reset
    Success { streak_cleared: bool },
    /// Target missed, streak still below the stalling threshold
    Failed { streak: u32, stalling_attempts: u32 },
    /// Threshold reached, prescribed weight reduced and streak reset
    Deload { from: f64, to: f64 },
    /// Threshold reached on a bodyweight movement; nothing to reduce
    DeloadNotApplicable { streak: u32 },
}

impl SetTransition {
    pub fn is_deload(&self) -> bool {
        matches!(self, SetTransition::Deload { .. })
    }
}

/// What the presentation layer asks for before each working set.
#[derive(Debug, Clone)]
pub struct SetPrompt<'a> {
    pub exercise: &'a ExerciseSpec,
    /// 1-based set index
    pub set: u32,
    /// Prescribed working weight
    pub weight: Weight,
}

/// What the presentation layer reports after each working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetInput {
    pub weight: Weight,
    pub reps: u32,
}

/// The user cancelled the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Session aborted by user")]
pub struct SessionAborted;

/// Errors related to running a training session.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Session cancelled before completion
    #[error("Session aborted by user")]
    Aborted,

    /// A workout list names an exercise missing from the program
    #[error("Exercise '{0}' is not defined in the program")]
    UnknownExercise(String),

    /// Storage error while evaluating guards
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<SessionAborted> for TrainingError {
    fn from(_: SessionAborted) -> Self {
        TrainingError::Aborted
    }
}
