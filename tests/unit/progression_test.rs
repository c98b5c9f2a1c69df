//! Unit tests for progression across consecutive sessions.

use std::collections::{HashMap, VecDeque};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use liftlog::program::{default_program, ExerciseSpec, Weight, WorkoutGroup};
use liftlog::storage::{HistoryStore, MemoryHistoryStore};
use liftlog::training::{
    SessionAborted, SessionIo, SessionOutcome, SessionWarning, SetInput, SetOutcome, SetPrompt,
    SetTransition, TrainingSession, WarmupSet, WorkoutRecorder,
};

/// Answers reps per exercise from a queue; unscripted sets hit the target.
#[derive(Default)]
struct Lifter {
    reps: HashMap<String, VecDeque<u32>>,
    current: String,
    transitions: Vec<(String, SetTransition)>,
}

impl Lifter {
    fn with_reps(mut self, exercise: &str, reps: &[u32]) -> Self {
        self.reps
            .insert(exercise.to_string(), reps.iter().copied().collect());
        self
    }
}

impl SessionIo for Lifter {
    fn confirm_warning(&mut self, _warning: SessionWarning) -> Result<bool, SessionAborted> {
        Ok(true)
    }

    fn workout_started(&mut self, _workout: WorkoutGroup, _exercises: &[String]) {}

    fn exercise_started(&mut self, spec: &ExerciseSpec, _weight: Weight, _warmups: &[WarmupSet]) {
        self.current = spec.name.clone();
    }

    fn record_set(&mut self, prompt: &SetPrompt<'_>) -> Result<SetInput, SessionAborted> {
        let reps = self
            .reps
            .get_mut(&prompt.exercise.name)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(prompt.exercise.reps);
        Ok(SetInput {
            weight: prompt.weight,
            reps,
        })
    }

    fn set_recorded(&mut self, _outcome: &SetOutcome, transition: &SetTransition) {
        self.transitions.push((self.current.clone(), *transition));
    }

    fn confirm_progression(
        &mut self,
        _spec: &ExerciseSpec,
        _from: Weight,
        _to: f64,
    ) -> Result<bool, SessionAborted> {
        Ok(true)
    }

    fn progression_applied(&mut self, _spec: &ExerciseSpec, _to: f64) {}
}

/// First day of an A week (weeks run Thursday to Wednesday).
fn week_a() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
}

fn evening(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(18, 0, 0).unwrap()
}

fn train(
    session: &mut TrainingSession,
    store: &mut MemoryHistoryStore,
    io: &mut Lifter,
    date: NaiveDate,
) -> SessionOutcome {
    WorkoutRecorder::new(session, store)
        .run(io, evening(date))
        .expect("session should run")
}

#[test]
fn test_two_clean_weeks() {
    let mut session = TrainingSession::fresh(default_program());
    let mut store = MemoryHistoryStore::new();

    // Three sessions in an A week, three in the following B week
    for offset in [0, 2, 4, 7, 9, 11] {
        let outcome = train(
            &mut session,
            &mut store,
            &mut Lifter::default(),
            week_a() + Duration::days(offset),
        );
        assert!(matches!(outcome, SessionOutcome::Completed(ref c) if c.saved()));
    }

    assert_eq!(session.current_weight("squat"), Some(Weight::kg(75.0)));
    assert_eq!(session.current_weight("bench_press"), Some(Weight::kg(57.5)));
    assert_eq!(session.current_weight("deadlift"), Some(Weight::kg(95.0)));
    assert_eq!(session.current_weight("overhead_press"), Some(Weight::kg(47.5)));
    assert_eq!(session.current_weight("power_clean"), Some(Weight::kg(47.5)));
    // 1 kg steps never clear the 2.5 kg rounding
    assert_eq!(session.current_weight("neck_curl"), Some(Weight::kg(5.0)));
    assert_eq!(session.current_weight("atlas_curl"), Some(Weight::Bodyweight));

    assert_eq!(store.workout_dates().unwrap().len(), 6);
    let weights = store.load_weights().unwrap().unwrap();
    assert_eq!(weights.get("squat"), Some(&Weight::kg(75.0)));
}

#[test]
fn test_streak_carries_across_sessions_into_deload() {
    let mut session = TrainingSession::fresh(default_program());
    let mut store = MemoryHistoryStore::new();

    // Last set missed: streak 1, no progression
    let mut io = Lifter::default().with_reps("squat", &[5, 5, 4]);
    train(&mut session, &mut store, &mut io, week_a());
    assert_eq!(session.current_weight("squat"), Some(Weight::kg(60.0)));
    assert_eq!(session.state("squat").unwrap().failure_streak, 1);

    // Two more misses reach the threshold on the second set
    let mut io = Lifter::default().with_reps("squat", &[4, 4, 5]);
    let outcome = train(&mut session, &mut store, &mut io, week_a() + Duration::days(2));
    let SessionOutcome::Completed(completed) = outcome else {
        panic!("Expected a completed session");
    };
    assert_eq!(completed.deloads.len(), 1);
    assert_eq!(completed.deloads[0].from, 60.0);
    assert_eq!(completed.deloads[0].to, 55.0);
    assert!(completed.progressions.iter().all(|p| p.exercise != "squat"));

    let squat = &completed.record.exercises["squat"];
    assert_eq!(squat.weight, Weight::kg(60.0));
    assert_eq!(squat.sets[1].deloaded_to, Some(Weight::kg(55.0)));
    assert_eq!(squat.sets[2].weight, Weight::kg(60.0));

    assert_eq!(session.current_weight("squat"), Some(Weight::kg(55.0)));
    assert_eq!(session.state("squat").unwrap().failure_streak, 0);

    // Clean session from the deloaded weight
    let mut io = Lifter::default();
    train(&mut session, &mut store, &mut io, week_a() + Duration::days(4));
    assert_eq!(session.current_weight("squat"), Some(Weight::kg(57.5)));
}

#[test]
fn test_bodyweight_failures_never_change_load() {
    let mut session = TrainingSession::fresh(default_program());
    let mut store = MemoryHistoryStore::new();

    let mut io = Lifter::default().with_reps("atlas_curl", &[3, 0]);
    train(&mut session, &mut store, &mut io, week_a());
    let mut io = Lifter::default().with_reps("atlas_curl", &[6, 6]);
    train(&mut session, &mut store, &mut io, week_a() + Duration::days(2));

    let atlas: Vec<_> = io
        .transitions
        .iter()
        .filter(|(name, _)| name == "atlas_curl")
        .map(|(_, transition)| *transition)
        .collect();
    assert_eq!(atlas[1], SetTransition::DeloadNotApplicable { streak: 4 });
    assert_eq!(session.current_weight("atlas_curl"), Some(Weight::Bodyweight));
    assert_eq!(session.state("atlas_curl").unwrap().failure_streak, 4);
}

#[test]
fn test_second_session_same_day_refused() {
    let mut session = TrainingSession::fresh(default_program());
    let mut store = MemoryHistoryStore::new();

    train(&mut session, &mut store, &mut Lifter::default(), week_a());
    let before = session.weights().clone();

    let outcome = train(&mut session, &mut store, &mut Lifter::default(), week_a());
    assert!(matches!(outcome, SessionOutcome::Refused));
    assert_eq!(session.weights(), &before);
}
