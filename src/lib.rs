//! LiftLog - strength training progression tracker
//!
//! A terminal application that walks through an alternating two-workout
//! barbell program, records every set, and adjusts working weights from the
//! results: linear progression after clean sessions, and a deload after a
//! run of failed ones.

pub mod app;
pub mod program;
pub mod storage;
pub mod training;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use program::{load_program, ProgramDefinition, Weight};
pub use storage::{open_store, AppConfig, HistoryStore};
pub use training::{ProgressionEngine, TrainingSession, WorkoutRecorder};
