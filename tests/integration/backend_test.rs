//! Integration tests for settings-driven backend selection.

use std::io::Cursor;

use chrono::NaiveDate;
use liftlog::program::{load_program, Weight};
use liftlog::storage::config::{load_config, save_config};
use liftlog::storage::{open_store, AppConfig, StorageBackend, DATABASE_FILE};
use liftlog::ui::{Prompter, Theme};
use liftlog::App;

fn thursday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
}

/// Run one clean Week A session against the configured backend.
fn run_clean_session(config: &AppConfig) {
    let store = open_store(config).unwrap();
    let program = load_program(config.program.path.as_deref());
    let input = format!("1\n{}q\n", "\n".repeat(30));
    let prompter = Prompter::new(Cursor::new(input.into_bytes()), Vec::new());

    let mut app = App::new(config.clone(), program, store, prompter, Theme::plain())
        .unwrap()
        .with_clock(|| thursday().and_hms_opt(6, 15, 0).unwrap());
    app.run().unwrap();
}

fn check_state_survives_restart(backend: StorageBackend) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::with_data_dir(dir.path().to_path_buf());
    config.storage.backend = backend;
    save_config(&config).unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.storage.backend, backend);
    run_clean_session(&config);

    let store = open_store(&config).unwrap();
    let weights = store.load_weights().unwrap().unwrap();
    assert_eq!(weights["squat"], Weight::kg(62.5));
    assert_eq!(weights["atlas_curl"], Weight::Bodyweight);
    assert_eq!(store.workout_dates().unwrap(), vec![thursday()]);

    let record = store.load_workout(thursday()).unwrap().unwrap();
    assert_eq!(record.exercises["deadlift"].sets.len(), 1);
    assert!(record.is_complete());
}

#[test]
fn test_file_backend_survives_restart() {
    check_state_survives_restart(StorageBackend::Files);
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::with_data_dir(dir.path().to_path_buf());
    run_clean_session(&config);
    assert!(dir.path().join("workouts").join("2024_01_04.yaml").exists());
    assert!(dir.path().join("current_weights.yaml").exists());
}

#[test]
fn test_sqlite_backend_survives_restart() {
    check_state_survives_restart(StorageBackend::Sqlite);
}

#[test]
fn test_sqlite_backend_uses_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::with_data_dir(dir.path().to_path_buf());
    config.storage.backend = StorageBackend::Sqlite;
    run_clean_session(&config);

    assert!(dir.path().join(DATABASE_FILE).exists());
    assert!(!dir.path().join("current_weights.yaml").exists());
}

#[test]
fn test_settings_select_program_file() {
    let dir = tempfile::tempdir().unwrap();
    let program_path = dir.path().join("program.yaml");
    std::fs::write(
        &program_path,
        "exercises:\n  squat: {starting_weight: 100, progression: 5, sets: 1, reps: 5}\n\
         workouts:\n  week_A: [squat]\n  week_B: [squat]\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("settings.toml"),
        format!(
            "[program]\npath = {:?}\n\n[logging]\nlevel = \"debug\"\n",
            program_path.display().to_string()
        ),
    )
    .unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.storage.backend, StorageBackend::Files);

    // One set plus its progression confirm, then the pause
    let store = open_store(&config).unwrap();
    let program = load_program(config.program.path.as_deref());
    assert!(program.warning.is_none());
    let prompter = Prompter::new(Cursor::new(b"1\n\n\n\n\nq\n".to_vec()), Vec::new());
    let mut app = App::new(config.clone(), program, store, prompter, Theme::plain())
        .unwrap()
        .with_clock(|| thursday().and_hms_opt(6, 15, 0).unwrap());
    app.run().unwrap();

    assert_eq!(app.session().current_weight("squat"), Some(Weight::kg(105.0)));
}
