//! Integration tests for the interactive application loop.
//!
//! Drives `App` end to end with scripted terminal input:
//! - a clean session with progression
//! - a deload carried over from earlier sessions
//! - refusal, warning and abort paths
//! - history and progress screens after saving

use std::io::Cursor;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use liftlog::program::{default_program, LoadedProgram, ProgramSource, Weight};
use liftlog::storage::{
    AppConfig, HistoryStore, MemoryHistoryStore, StreakSnapshot, WeightSnapshot,
};
use liftlog::training::{workout_for, TrainingSession, WorkoutRecord};
use liftlog::ui::{Prompter, Theme};
use liftlog::App;

type TestApp = App<Cursor<Vec<u8>>, Vec<u8>>;

/// Everything worth asserting once the loop has ended.
struct Finished {
    output: String,
    weights: WeightSnapshot,
    streaks: StreakSnapshot,
    dates: Vec<NaiveDate>,
}

impl Finished {
    fn weight(&self, name: &str) -> Weight {
        self.weights[name]
    }
}

/// Answers for one default Week A session where every set hits its target:
/// 29 prompts, then the pause afterwards.
fn clean_week_a() -> String {
    format!("1\n{}", "\n".repeat(30))
}

/// Thursday of an A week.
fn thursday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
}

fn now() -> NaiveDateTime {
    thursday().and_hms_opt(18, 30, 0).unwrap()
}

fn builtin_program() -> LoadedProgram {
    LoadedProgram {
        program: default_program(),
        source: ProgramSource::BuiltIn,
        warning: None,
    }
}

fn app_with(store: Box<dyn HistoryStore>, input: &str) -> TestApp {
    let prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    App::new(
        AppConfig::with_data_dir(std::env::temp_dir()),
        builtin_program(),
        store,
        prompter,
        Theme::plain(),
    )
    .unwrap()
    .with_clock(now)
}

fn finish(mut app: TestApp) -> Finished {
    app.run().unwrap();
    let weights = app.session().weights().clone();
    let streaks = app.session().streaks().clone();
    let dates = app.store().workout_dates().unwrap();
    Finished {
        output: String::from_utf8(app.into_output()).unwrap(),
        weights,
        streaks,
        dates,
    }
}

/// Store holding one saved session on `date` at default weights.
fn store_with_session(date: NaiveDate) -> MemoryHistoryStore {
    let mut store = MemoryHistoryStore::new();
    let session = TrainingSession::fresh(default_program());
    let record = WorkoutRecord {
        date,
        time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        workout: workout_for(date),
        exercises: Default::default(),
    };
    assert!(session.persist(&mut store, Some(&record)).is_empty());
    store
}

#[test]
fn test_clean_session_progresses() {
    let app = app_with(Box::new(MemoryHistoryStore::new()), &clean_week_a());
    let done = finish(app);

    assert_eq!(done.weight("squat"), Weight::kg(62.5));
    assert_eq!(done.weight("bench_press"), Weight::kg(52.5));
    assert_eq!(done.weight("deadlift"), Weight::kg(85.0));
    assert_eq!(done.weight("overhead_press"), Weight::kg(40.0));
    assert_eq!(done.weight("neck_curl"), Weight::kg(5.0));
    assert_eq!(done.dates, vec![thursday()]);

    let out = &done.output;
    assert!(out.contains("LiftLog"));
    assert!(out.contains("Warmup sets:"));
    assert!(out.contains("  1. 30 kg × 5"));
    assert!(out.contains("Increase weight by 2.5 kg (60 → 62.5 kg)? [Y/n]: "));
    assert!(out.contains("Squat weight increased to 62.5 kg"));
    assert!(out.contains("Workout saved for 2024-01-04"));
    assert!(out.trim_end().ends_with("Goodbye."));
}

#[test]
fn test_streak_from_store_deloads() {
    let mut store = MemoryHistoryStore::new();
    let mut streaks = StreakSnapshot::new();
    streaks.insert("squat".to_string(), 2);
    store.save_streaks(&streaks).unwrap();

    // First squat set: default weight, 3 reps
    let input = format!("1\n\n3\n{}", "\n".repeat(40));
    let done = finish(app_with(Box::new(store), &input));

    assert_eq!(done.weight("squat"), Weight::kg(55.0));
    assert_eq!(done.streaks["squat"], 0);
    assert!(done.output.contains("Automatic deload: Weight reduced to 55 kg"));
    assert!(done.output.contains("The new weight applies from the next session."));
    assert!(!done.output.contains("Squat weight increased"));
}

#[test]
fn test_second_session_refused() {
    let store = store_with_session(thursday());
    let done = finish(app_with(Box::new(store), "1\n\n"));

    assert!(done
        .output
        .contains("You have already worked out today. Rest is important."));
    assert_eq!(done.weight("squat"), Weight::kg(60.0));
    assert_eq!(done.dates, vec![thursday()]);
}

#[test]
fn test_trained_yesterday_defaults_to_no() {
    let yesterday = thursday().pred_opt().unwrap();
    let store = store_with_session(yesterday);
    let done = finish(app_with(Box::new(store), "1\n\n\n"));

    assert!(done
        .output
        .contains("You worked out yesterday. One rest day is recommended."));
    assert!(done.output.contains("Are you sure you want to workout today? [y/N]: "));
    assert!(done.output.contains("Workout not started."));
    assert_eq!(done.dates, vec![yesterday]);
}

#[test]
fn test_abort_saves_nothing() {
    let done = finish(app_with(
        Box::new(MemoryHistoryStore::new()),
        "1\n\n5\n\nabort\n\n",
    ));

    assert!(done.output.contains("Workout aborted. Nothing was saved."));
    assert!(done.dates.is_empty());
    assert_eq!(done.weight("squat"), Weight::kg(60.0));
    assert_eq!(done.streaks["squat"], 0);
}

#[test]
fn test_declined_retry_keeps_session_in_memory() {
    let mut input = clean_week_a();
    // Swap the pause for a refused retry plus the pause
    input.pop();
    input.push_str("n\n\n");

    let done = finish(app_with(Box::new(MemoryHistoryStore::failing_writes()), &input));

    assert!(done.output.contains("Save failed:"));
    assert!(done.output.contains("Retry saving? [Y/n]: "));
    assert!(done.output.contains("Workout record not saved."));
    assert!(done.dates.is_empty());
    assert_eq!(done.weight("squat"), Weight::kg(62.5));
}

#[test]
fn test_history_and_progress_screens() {
    let mut input = clean_week_a();
    input.push_str("2\n\n3\n\nq\n");
    let done = finish(app_with(Box::new(MemoryHistoryStore::new()), &input));

    let out = &done.output;
    assert!(out.contains("Workout History"));
    assert!(out.contains("2024-01-04"));
    assert!(out.contains("6 exercises"));
    assert!(out.contains("Current Weights"));
    assert!(out.contains("+2.5 kg"));
    assert!(out.contains("N/A"));
}

#[test]
fn test_empty_history() {
    let done = finish(app_with(Box::new(MemoryHistoryStore::new()), "2\n\nq\n"));
    assert!(done.output.contains("No workout entries found."));
}

#[test]
fn test_cancel_at_menu_quits() {
    let done = finish(app_with(Box::new(MemoryHistoryStore::new()), "cancel\n1\n"));
    assert!(done.output.contains("Goodbye."));
    assert!(!done.output.contains("Warmup sets:"));
}
