//! Warm-up ramp derivation.

use crate::program::{ExerciseSpec, Weight};

/// Ramp as (percent of working weight, reps), ascending by intensity.
pub const WARMUP_RAMP: [(u32, u32); 3] = [(50, 5), (70, 3), (90, 1)];

/// A preparatory set before the working sets. Display only, never recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarmupSet {
    pub weight: f64,
    pub reps: u32,
}

/// Derive the warm-up ramp for a working weight.
///
/// Weights are truncated to whole units, not rounded to the loading
/// increment. Bodyweight movements and `no_warmup` exercises get no ramp.
pub fn warmup_sets(working_weight: Weight, spec: &ExerciseSpec) -> Vec<WarmupSet> {
    let weight = match working_weight {
        Weight::Numeric(weight) if !spec.no_warmup => weight,
        _ => return Vec::new(),
    };

    WARMUP_RAMP
        .iter()
        .map(|&(percent, reps)| WarmupSet {
            weight: (weight * percent as f64 / 100.0).floor(),
            reps,
        })
        .collect()
}
