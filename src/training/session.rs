//! Training session state.
//!
//! `TrainingSession` owns the program and the mutable per-exercise state and
//! is passed explicitly to whatever needs it. Snapshot entries for names the
//! program no longer defines are carried along untouched.

use std::collections::BTreeMap;

use crate::program::{ExerciseSpec, ProgramDefinition, Weight};
use crate::storage::{HistoryStore, StoreError, StreakSnapshot, WeightSnapshot};
use crate::training::engine::ProgressionEngine;
use crate::training::types::{ExerciseState, WorkoutRecord};

/// Program plus current weights and failure streaks.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    program: ProgramDefinition,
    engine: ProgressionEngine,
    weights: WeightSnapshot,
    streaks: StreakSnapshot,
}

/// Result of loading a session from a store.
#[derive(Debug)]
pub struct LoadedSession {
    pub session: TrainingSession,
    /// Unreadable snapshots that were replaced by defaults
    pub warnings: Vec<StoreError>,
    /// Snapshots were missing or incomplete and should be written back
    pub needs_save: bool,
}

impl TrainingSession {
    /// Build a session from snapshots, filling in exercises they lack.
    pub fn new(program: ProgramDefinition, weights: WeightSnapshot, streaks: StreakSnapshot) -> Self {
        let engine = ProgressionEngine::for_program(&program);
        let mut session = Self {
            program,
            engine,
            weights,
            streaks,
        };
        session.reconcile();
        session
    }

    /// Session with every exercise at its starting weight.
    pub fn fresh(program: ProgramDefinition) -> Self {
        Self::new(program, WeightSnapshot::new(), StreakSnapshot::new())
    }

    /// Load snapshots from a store. Unreadable snapshots fall back to defaults.
    pub fn load(program: ProgramDefinition, store: &dyn HistoryStore) -> LoadedSession {
        let mut warnings = Vec::new();

        let (weights, weights_found) = match store.load_weights() {
            Ok(Some(weights)) => (weights, true),
            Ok(None) => (WeightSnapshot::new(), false),
            Err(e) => {
                tracing::warn!("Reinitializing current weights: {}", e);
                warnings.push(e);
                (WeightSnapshot::new(), true)
            }
        };
        let (streaks, streaks_found) = match store.load_streaks() {
            Ok(Some(streaks)) => (streaks, true),
            Ok(None) => (StreakSnapshot::new(), false),
            Err(e) => {
                tracing::warn!("Reinitializing failure streaks: {}", e);
                warnings.push(e);
                (StreakSnapshot::new(), true)
            }
        };

        let incomplete = program
            .exercises
            .iter()
            .any(|spec| !weights.contains_key(&spec.name) || !streaks.contains_key(&spec.name));
        let needs_save = warnings.is_empty() && (!weights_found || !streaks_found || incomplete);

        let session = Self::new(program, weights, streaks);
        tracing::info!(
            "Loaded state for {} exercises",
            session.program.exercises.len()
        );

        LoadedSession {
            session,
            warnings,
            needs_save,
        }
    }

    fn reconcile(&mut self) {
        for spec in self.program.exercises.iter() {
            if !self.weights.contains_key(&spec.name) {
                tracing::debug!("Initializing weight for {}", spec.name);
                self.weights.insert(spec.name.clone(), spec.starting_weight);
            }
            self.streaks.entry(spec.name.clone()).or_insert(0);
        }
    }

    pub fn program(&self) -> &ProgramDefinition {
        &self.program
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    /// Current weights, including names the program does not define.
    pub fn weights(&self) -> &WeightSnapshot {
        &self.weights
    }

    /// Failure streaks, including names the program does not define.
    pub fn streaks(&self) -> &StreakSnapshot {
        &self.streaks
    }

    /// Current state of an exercise.
    pub fn state(&self, name: &str) -> Option<ExerciseState> {
        let current_weight = *self.weights.get(name)?;
        let failure_streak = self.streaks.get(name).copied().unwrap_or(0);
        Some(ExerciseState {
            current_weight,
            failure_streak,
        })
    }

    /// Current weight of an exercise.
    pub fn current_weight(&self, name: &str) -> Option<Weight> {
        self.weights.get(name).copied()
    }

    /// State of every program exercise, for use as a scratch copy.
    pub fn states(&self) -> BTreeMap<String, ExerciseState> {
        self.program
            .exercises
            .iter()
            .filter_map(|spec| self.state(&spec.name).map(|state| (spec.name.clone(), state)))
            .collect()
    }

    /// Progress rows in declaration order: (spec, current weight).
    pub fn progress(&self) -> Vec<(&ExerciseSpec, Weight)> {
        self.program
            .exercises
            .iter()
            .map(|spec| {
                let current = self.current_weight(&spec.name).unwrap_or(spec.starting_weight);
                (spec, current)
            })
            .collect()
    }

    /// Replace the states of the given exercises.
    pub(crate) fn commit(&mut self, states: BTreeMap<String, ExerciseState>) {
        for (name, state) in states {
            self.weights.insert(name.clone(), state.current_weight);
            self.streaks.insert(name, state.failure_streak);
        }
    }

    /// Write the record (if any) and both snapshots. Returns every failure.
    pub fn persist(
        &self,
        store: &mut dyn HistoryStore,
        record: Option<&WorkoutRecord>,
    ) -> Vec<StoreError> {
        let mut errors = Vec::new();

        if let Some(record) = record {
            if let Err(e) = store.save_workout(record) {
                errors.push(e);
            }
        }
        if let Err(e) = store.save_weights(&self.weights) {
            errors.push(e);
        }
        if let Err(e) = store.save_streaks(&self.streaks) {
            errors.push(e);
        }

        if errors.is_empty() {
            tracing::info!("Saved training state");
        } else {
            for e in &errors {
                tracing::warn!("Save failed: {}", e);
            }
        }
        errors
    }
}
