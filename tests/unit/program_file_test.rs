//! Unit tests for program files driving the schedule and engine.

use std::io::Write;

use chrono::NaiveDate;
use liftlog::program::{load_program, ProgramSource, Weight};
use liftlog::training::{exercises_for, ProgressionEngine, TrainingSession};
use tempfile::NamedTempFile;

const CUSTOM: &str = r#"
program:
  name: Garage Barbell
exercises:
  squat: {starting_weight: 100, progression: 2.5, sets: 5, reps: 5}
  press: {starting_weight: 41, progression: 1.25, sets: 3, reps: 5}
  dip: {starting_weight: bodyweight, progression: 0, sets: 3, reps: 12, no_warmup: true}
workouts:
  week_A: [squat, press]
  week_B: [squat, dip]
bonus_exercises: [dip]
deload: {stalling_attempts: 2, reduce_percent: 15}
rounding: {increment: 1.25, unit: lb}
"#;

fn write_program(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_custom_program_file() {
    let file = write_program(CUSTOM);
    let loaded = load_program(Some(file.path()));

    assert!(loaded.warning.is_none());
    assert_eq!(loaded.source, ProgramSource::File(file.path().to_path_buf()));
    assert_eq!(loaded.program.program.name, "Garage Barbell");

    // 2024-01-11 falls in a B week
    let names = exercises_for(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(), &loaded.program);
    assert_eq!(names, vec!["squat", "dip", "dip"]);
}

#[test]
fn test_custom_policies_reach_the_engine() {
    let file = write_program(CUSTOM);
    let program = load_program(Some(file.path())).program;
    let engine = ProgressionEngine::for_program(&program);

    // 100 * 0.85 = 85 (exact multiple of 1.25)
    let mut state = TrainingSession::fresh(program.clone()).state("squat").unwrap();
    engine.apply_set(&mut state, Weight::kg(100.0), 5, 2);
    engine.apply_set(&mut state, Weight::kg(100.0), 5, 2);
    assert_eq!(state.current_weight, Weight::kg(85.0));

    // 41 is not a multiple of 1.25, progression rounds 42.25 to 42.5
    let press = program.exercise("press").unwrap();
    assert_eq!(engine.progressed_weight(press, Weight::kg(41.0)), Some(42.5));
}

#[test]
fn test_broken_file_falls_back_to_builtin() {
    let file = write_program("exercises: [not, a, mapping]\n");
    let loaded = load_program(Some(file.path()));

    assert!(loaded.warning.is_some());
    assert_eq!(loaded.source, ProgramSource::BuiltIn);
    assert_eq!(loaded.program.exercises.len(), 8);
}

#[test]
fn test_explicit_missing_file_warns() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_program(Some(&dir.path().join("nope.yaml")));
    assert!(loaded.warning.is_some());
    assert_eq!(loaded.source, ProgramSource::BuiltIn);
}
