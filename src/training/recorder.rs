//! Workout recorder.
//!
//! Runs one session against a [`SessionIo`] port: guards, then every
//! exercise block, then commit and persist. All state changes are made on a
//! scratch copy so an aborted session leaves the `TrainingSession` and the
//! store untouched.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::program::{ExerciseSpec, Weight, WorkoutGroup};
use crate::storage::{HistoryStore, StoreError};
use crate::training::guards::{SessionGuards, SessionWarning};
use crate::training::schedule::{exercises_for, workout_for};
use crate::training::session::TrainingSession;
use crate::training::types::{
    ExerciseRecord, ExerciseState, SessionAborted, SetInput, SetOutcome, SetPrompt, SetTransition,
    TrainingError, WorkoutRecord,
};
use crate::training::warmup::{warmup_sets, WarmupSet};

/// Presentation port used while a session runs.
///
/// Methods returning `Result` may abort the session; notifications cannot.
pub trait SessionIo {
    /// Ask whether to continue despite a soft warning.
    fn confirm_warning(&mut self, warning: SessionWarning) -> Result<bool, SessionAborted>;

    /// The session starts with these exercises, in order.
    fn workout_started(&mut self, workout: WorkoutGroup, exercises: &[String]);

    /// A block starts: prescription and warm-up ramp.
    fn exercise_started(&mut self, spec: &ExerciseSpec, weight: Weight, warmups: &[WarmupSet]);

    /// Obtain the performed weight and reps of one working set.
    fn record_set(&mut self, prompt: &SetPrompt<'_>) -> Result<SetInput, SessionAborted>;

    /// A set was recorded and fed into the engine.
    fn set_recorded(&mut self, outcome: &SetOutcome, transition: &SetTransition);

    /// Ask whether to apply an earned progression.
    fn confirm_progression(
        &mut self,
        spec: &ExerciseSpec,
        from: Weight,
        to: f64,
    ) -> Result<bool, SessionAborted>;

    /// An earned progression was applied.
    fn progression_applied(&mut self, spec: &ExerciseSpec, to: f64);
}

/// A deload triggered during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct DeloadEvent {
    pub exercise: String,
    pub from: f64,
    pub to: f64,
}

/// A progression applied at the end of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEvent {
    pub exercise: String,
    pub from: f64,
    pub to: f64,
}

/// A finished and committed session.
#[derive(Debug)]
pub struct CompletedSession {
    pub record: WorkoutRecord,
    pub deloads: Vec<DeloadEvent>,
    pub progressions: Vec<ProgressionEvent>,
    /// Persistence failures; the session is committed in memory regardless
    pub save_errors: Vec<StoreError>,
}

impl CompletedSession {
    pub fn saved(&self) -> bool {
        self.save_errors.is_empty()
    }
}

/// How a session request ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// A session is already recorded for today
    Refused,
    /// The user declined to continue after a warning
    Declined(SessionWarning),
    /// The user cancelled mid-session; nothing was committed
    Aborted,
    Completed(CompletedSession),
}

struct Blocks {
    record: WorkoutRecord,
    states: BTreeMap<String, ExerciseState>,
    deloads: Vec<DeloadEvent>,
    progressions: Vec<ProgressionEvent>,
}

/// Orchestrates one training session.
pub struct WorkoutRecorder<'a> {
    session: &'a mut TrainingSession,
    store: &'a mut dyn HistoryStore,
}

impl<'a> WorkoutRecorder<'a> {
    pub fn new(session: &'a mut TrainingSession, store: &'a mut dyn HistoryStore) -> Self {
        Self { session, store }
    }

    /// Run a session dated `now`.
    pub fn run(
        &mut self,
        io: &mut dyn SessionIo,
        now: NaiveDateTime,
    ) -> Result<SessionOutcome, TrainingError> {
        let today = now.date();

        let guards = SessionGuards::evaluate(&*self.store, today)?;
        if guards.refused() {
            tracing::info!("Session refused, already trained on {}", today);
            return Ok(SessionOutcome::Refused);
        }

        for warning in guards.warnings() {
            match io.confirm_warning(warning) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!("Session declined after {:?}", warning);
                    return Ok(SessionOutcome::Declined(warning));
                }
                Err(SessionAborted) => return Ok(SessionOutcome::Aborted),
            }
        }

        let blocks = match self.record_blocks(io, now) {
            Ok(blocks) => blocks,
            Err(TrainingError::Aborted) => {
                tracing::info!("Session aborted, discarding partial record");
                return Ok(SessionOutcome::Aborted);
            }
            Err(e) => return Err(e),
        };

        self.session.commit(blocks.states);
        let save_errors = self.session.persist(&mut *self.store, Some(&blocks.record));
        tracing::info!(
            "Session {} completed with {} exercises",
            blocks.record.date_key(),
            blocks.record.exercise_count()
        );

        Ok(SessionOutcome::Completed(CompletedSession {
            record: blocks.record,
            deloads: blocks.deloads,
            progressions: blocks.progressions,
            save_errors,
        }))
    }

    fn record_blocks(
        &self,
        io: &mut dyn SessionIo,
        now: NaiveDateTime,
    ) -> Result<Blocks, TrainingError> {
        let today: NaiveDate = now.date();
        let program = self.session.program();
        let engine = self.session.engine();

        let workout = workout_for(today);
        let names = exercises_for(today, program);
        if let Some(missing) = names.iter().find(|name| program.exercise(name).is_none()) {
            return Err(TrainingError::UnknownExercise(missing.clone()));
        }

        let mut states = self.session.states();
        let mut exercises = BTreeMap::new();
        let mut deloads = Vec::new();
        let mut progressions = Vec::new();

        io.workout_started(workout, &names);

        for name in &names {
            let spec = program
                .exercise(name)
                .ok_or_else(|| TrainingError::UnknownExercise(name.clone()))?;
            let state = states
                .entry(name.clone())
                .or_insert_with(|| ExerciseState::initial(spec));
            let working = state.current_weight;

            io.exercise_started(spec, working, &warmup_sets(working, spec));

            let mut sets = Vec::with_capacity(spec.sets as usize);
            for set in 1..=spec.sets {
                let prompt = SetPrompt {
                    exercise: spec,
                    set,
                    weight: working,
                };
                let input = io.record_set(&prompt)?;

                let mut outcome = SetOutcome::new(set, input.weight, spec.reps, input.reps);
                let transition = engine.apply_set(state, working, spec.reps, input.reps);
                if let SetTransition::Deload { from, to } = transition {
                    outcome.deloaded_to = Some(Weight::Numeric(to));
                    deloads.push(DeloadEvent {
                        exercise: name.clone(),
                        from,
                        to,
                    });
                }
                io.set_recorded(&outcome, &transition);
                sets.push(outcome);
            }

            let earned = engine
                .progression_due(spec, working, &sets)
                .then(|| engine.progressed_weight(spec, working))
                .flatten();
            if let Some(to) = earned {
                if io.confirm_progression(spec, working, to)? {
                    engine.apply_progression(state, spec, working, &sets);
                    progressions.push(ProgressionEvent {
                        exercise: name.clone(),
                        from: working.value().unwrap_or_default(),
                        to,
                    });
                    io.progression_applied(spec, to);
                }
            }

            exercises.insert(
                name.clone(),
                ExerciseRecord {
                    weight: working,
                    sets,
                    completed: true,
                },
            );
        }

        let time = now.time();
        let record = WorkoutRecord {
            date: today,
            time: time.with_nanosecond(0).unwrap_or(time),
            workout,
            exercises,
        };

        Ok(Blocks {
            record,
            states,
            deloads,
            progressions,
        })
    }
}
