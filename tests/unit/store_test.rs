//! Unit tests for behaviour shared by the history store backends.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use liftlog::program::{default_program, Weight, WorkoutGroup};
use liftlog::storage::{
    FileHistoryStore, HistoryStore, SqliteHistoryStore, StreakSnapshot, WeightSnapshot,
    DATABASE_FILE,
};
use liftlog::training::{ExerciseRecord, SetOutcome, TrainingSession, WorkoutRecord};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(date: NaiveDate, failed_reps: Option<u32>) -> WorkoutRecord {
    let reps = failed_reps.unwrap_or(5);
    let mut exercises = BTreeMap::new();
    exercises.insert(
        "squat".to_string(),
        ExerciseRecord {
            weight: Weight::kg(62.5),
            sets: vec![
                SetOutcome::new(1, Weight::kg(62.5), 5, 5),
                SetOutcome::new(2, Weight::kg(62.5), 5, reps),
            ],
            completed: true,
        },
    );
    exercises.insert(
        "atlas_curl".to_string(),
        ExerciseRecord {
            weight: Weight::Bodyweight,
            sets: vec![SetOutcome::new(1, Weight::Bodyweight, 10, 10)],
            completed: true,
        },
    );
    WorkoutRecord {
        date,
        time: NaiveTime::from_hms_opt(7, 45, 0).unwrap(),
        workout: WorkoutGroup::WeekA,
        exercises,
    }
}

fn open_files(dir: &Path) -> Box<dyn HistoryStore> {
    Box::new(FileHistoryStore::open(dir).unwrap())
}

fn open_sqlite(dir: &Path) -> Box<dyn HistoryStore> {
    Box::new(SqliteHistoryStore::open(&dir.join(DATABASE_FILE)).unwrap())
}

/// Write with one handle, read back through a fresh one.
fn check_survives_reopen(open: fn(&Path) -> Box<dyn HistoryStore>) {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = open(dir.path());
        assert!(store.load_weights().unwrap().is_none());
        assert!(store.load_streaks().unwrap().is_none());

        let mut weights = WeightSnapshot::new();
        weights.insert("squat".to_string(), Weight::kg(62.5));
        weights.insert("atlas_curl".to_string(), Weight::Bodyweight);
        let mut streaks = StreakSnapshot::new();
        streaks.insert("squat".to_string(), 2);

        store.save_weights(&weights).unwrap();
        store.save_streaks(&streaks).unwrap();
        store.save_workout(&record(date(2024, 3, 4), None)).unwrap();
        store.save_workout(&record(date(2024, 3, 6), Some(3))).unwrap();
        store.save_workout(&record(date(2024, 2, 28), None)).unwrap();
    }

    let store = open(dir.path());
    let weights = store.load_weights().unwrap().unwrap();
    assert_eq!(weights["squat"], Weight::kg(62.5));
    assert_eq!(weights["atlas_curl"], Weight::Bodyweight);
    assert_eq!(store.load_streaks().unwrap().unwrap()["squat"], 2);

    assert_eq!(
        store.workout_dates().unwrap(),
        vec![date(2024, 2, 28), date(2024, 3, 4), date(2024, 3, 6)]
    );
    assert!(store.has_workout_on(date(2024, 3, 4)).unwrap());
    assert!(!store.has_workout_on(date(2024, 3, 5)).unwrap());
    // Monday 2024-03-04 starts the week; 2024-02-28 belongs to the previous one
    assert_eq!(store.count_workouts_in_week(date(2024, 3, 7)).unwrap(), 2);

    let loaded = store.load_workout(date(2024, 3, 6)).unwrap().unwrap();
    assert_eq!(loaded, record(date(2024, 3, 6), Some(3)));
    assert!(loaded.exercises["squat"].any_failed());

    let recent = store.recent_workouts(2).unwrap();
    let dates: Vec<_> = recent.iter().map(|entry| entry.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 6), date(2024, 3, 4)]);
}

#[test]
fn test_file_store_survives_reopen() {
    check_survives_reopen(open_files);
}

#[test]
fn test_sqlite_store_survives_reopen() {
    check_survives_reopen(open_sqlite);
}

/// An empty snapshot is still a saved snapshot.
fn check_empty_snapshot_is_present(open: fn(&Path) -> Box<dyn HistoryStore>) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());
    store.save_streaks(&StreakSnapshot::new()).unwrap();
    assert_eq!(store.load_streaks().unwrap(), Some(StreakSnapshot::new()));
}

#[test]
fn test_empty_snapshot_is_present() {
    check_empty_snapshot_is_present(open_files);
    check_empty_snapshot_is_present(open_sqlite);
}

#[test]
fn test_session_keeps_unknown_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileHistoryStore::open(dir.path()).unwrap();

    let mut weights = WeightSnapshot::new();
    weights.insert("zercher_squat".to_string(), Weight::kg(70.0));
    store.save_weights(&weights).unwrap();

    let loaded = TrainingSession::load(default_program(), &store);
    assert!(loaded.needs_save);
    assert!(loaded.warnings.is_empty());
    assert!(loaded.session.persist(&mut store, None).is_empty());

    let saved = store.load_weights().unwrap().unwrap();
    assert_eq!(saved["zercher_squat"], Weight::kg(70.0));
    assert_eq!(saved["squat"], Weight::kg(60.0));
    assert_eq!(saved.len(), 9);
}

#[test]
fn test_corrupt_snapshot_reinitialized() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileHistoryStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("current_weights.yaml"), "squat: [heavy\n").unwrap();

    let loaded = TrainingSession::load(default_program(), &store);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].is_read_error());
    assert!(!loaded.needs_save);
    assert_eq!(loaded.session.current_weight("squat"), Some(Weight::kg(60.0)));
}

#[test]
fn test_corrupt_record_reported_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileHistoryStore::open(dir.path()).unwrap();
    store.save_workout(&record(date(2024, 3, 4), None)).unwrap();
    std::fs::write(store.workout_path(date(2024, 3, 6)), "exercises: 12\n").unwrap();

    let recent = store.recent_workouts(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent[0].record.is_err());
    assert!(recent[1].record.is_ok());
}
