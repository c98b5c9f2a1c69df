//! Program module: the static description of exercises, workouts and policies.

pub mod defaults;
pub mod loader;
pub mod types;

pub use defaults::default_program;
pub use loader::{load_program, load_program_file, parse_program, LoadedProgram, ProgramSource};
pub use types::{
    display_name, format_load, ConfigError, DeloadPolicy, ExerciseCatalog, ExerciseSpec,
    ProgramDefinition, ProgramInfo, RoundingPolicy, TrainingDays, Weight, WorkoutGroup, Workouts,
};
