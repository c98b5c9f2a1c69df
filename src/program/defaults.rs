//! Built-in program used when no program file is available.

use super::types::{
    DeloadPolicy, ExerciseCatalog, ExerciseSpec, ProgramDefinition, ProgramInfo, RoundingPolicy,
    Weight, Workouts,
};

/// The classic Starting Strength A/B program with three accessory movements.
pub fn default_program() -> ProgramDefinition {
    let specs = vec![
        ExerciseSpec::new("squat", Weight::kg(60.0), 2.5, 3, 5),
        ExerciseSpec::new("bench_press", Weight::kg(50.0), 2.5, 3, 5),
        ExerciseSpec::new("overhead_press", Weight::kg(40.0), 2.5, 3, 5),
        ExerciseSpec::new("deadlift", Weight::kg(80.0), 5.0, 1, 5),
        ExerciseSpec::new("power_clean", Weight::kg(40.0), 2.5, 5, 3),
        ExerciseSpec::new("atlas_curl", Weight::Bodyweight, 0.0, 2, 10).without_warmup(),
        ExerciseSpec::new("neck_curl", Weight::kg(5.0), 1.0, 3, 15).without_warmup(),
        ExerciseSpec::new("hanging_leg_raise", Weight::Bodyweight, 0.0, 3, 10).without_warmup(),
    ];

    ProgramDefinition {
        program: ProgramInfo::default(),
        exercises: ExerciseCatalog::from_unique_specs(specs),
        workouts: Workouts {
            week_a: names(&["squat", "bench_press", "deadlift"]),
            week_b: names(&["squat", "overhead_press", "power_clean"]),
        },
        bonus_exercises: names(&["atlas_curl", "neck_curl", "hanging_leg_raise"]),
        deload: DeloadPolicy::default(),
        rounding: RoundingPolicy::default(),
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}
