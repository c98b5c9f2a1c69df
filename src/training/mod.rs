//! Training module: scheduling, progression and session recording.

pub mod engine;
pub mod guards;
pub mod recorder;
pub mod schedule;
pub mod session;
pub mod types;
pub mod warmup;

pub use engine::ProgressionEngine;
pub use guards::{SessionGuards, SessionWarning, WEEKLY_SESSION_LIMIT};
pub use recorder::{
    CompletedSession, DeloadEvent, ProgressionEvent, SessionIo, SessionOutcome, WorkoutRecorder,
};
pub use schedule::{exercises_for, week_start, workout_for};
pub use session::{LoadedSession, TrainingSession};
pub use types::{
    ExerciseRecord, ExerciseState, SessionAborted, SetInput, SetOutcome, SetPrompt, SetTransition,
    TrainingError, WorkoutRecord,
};
pub use warmup::{warmup_sets, WarmupSet};
