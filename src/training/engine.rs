//! Progression engine.
//!
//! Maps (prescribed weight, failure streak, set outcomes) to the next
//! prescribed weight and streak. Streaks are tracked per set, progression is
//! decided per block:
//! - every failed set increments the streak and may deload mid-block
//! - every successful set clears the streak
//! - a block with zero failed sets earns the exercise's progression

use crate::program::{DeloadPolicy, ExerciseSpec, ProgramDefinition, RoundingPolicy, Weight};
use crate::training::types::{ExerciseState, SetOutcome, SetTransition};

/// Linear progression with deload.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    deload: DeloadPolicy,
    rounding: RoundingPolicy,
}

impl ProgressionEngine {
    /// Create an engine from explicit policies.
    pub fn new(deload: DeloadPolicy, rounding: RoundingPolicy) -> Self {
        Self { deload, rounding }
    }

    /// Create an engine using a program's policies.
    pub fn for_program(program: &ProgramDefinition) -> Self {
        Self::new(program.deload, program.rounding.clone())
    }

    pub fn deload_policy(&self) -> &DeloadPolicy {
        &self.deload
    }

    pub fn rounding(&self) -> &RoundingPolicy {
        &self.rounding
    }

    /// Feed one working set into the state.
    ///
    /// `working_weight` is the weight prescribed when the block started. A
    /// deload is computed from it and written to `state` only, so it applies
    /// from the next session on.
    pub fn apply_set(
        &self,
        state: &mut ExerciseState,
        working_weight: Weight,
        target_reps: u32,
        actual_reps: u32,
    ) -> SetTransition {
        if actual_reps >= target_reps {
            let streak_cleared = state.failure_streak > 0;
            state.failure_streak = 0;
            return SetTransition::Success { streak_cleared };
        }

        state.failure_streak = state.failure_streak.saturating_add(1);

        if state.failure_streak < self.deload.stalling_attempts {
            tracing::debug!(
                "Failed set, streak {}/{}",
                state.failure_streak,
                self.deload.stalling_attempts
            );
            return SetTransition::Failed {
                streak: state.failure_streak,
                stalling_attempts: self.deload.stalling_attempts,
            };
        }

        match working_weight {
            Weight::Numeric(from) => {
                let factor = 1.0 - self.deload.reduce_percent / 100.0;
                let to = self.rounding.round_value(from * factor);
                state.current_weight = Weight::Numeric(to);
                state.failure_streak = 0;
                tracing::info!("Deload triggered: {} -> {}", from, to);
                SetTransition::Deload { from, to }
            }
            // Streak keeps growing for bodyweight movements
            Weight::Bodyweight => {
                tracing::debug!(
                    "Deload threshold reached on bodyweight movement, streak {}",
                    state.failure_streak
                );
                SetTransition::DeloadNotApplicable {
                    streak: state.failure_streak,
                }
            }
        }
    }

    /// Check whether a finished block earns progression.
    pub fn progression_due(
        &self,
        spec: &ExerciseSpec,
        working_weight: Weight,
        sets: &[SetOutcome],
    ) -> bool {
        !sets.iter().any(|set| set.failed)
            && spec.progression > 0.0
            && !working_weight.is_bodyweight()
    }

    /// Weight after progression, if the exercise progresses at all.
    pub fn progressed_weight(&self, spec: &ExerciseSpec, working_weight: Weight) -> Option<f64> {
        match working_weight {
            Weight::Numeric(weight) if spec.progression > 0.0 => {
                Some(self.rounding.round_value(weight + spec.progression))
            }
            _ => None,
        }
    }

    /// Apply block-level progression. Returns the new weight when it fired.
    ///
    /// The streak is left untouched; it was already managed per set.
    pub fn apply_progression(
        &self,
        state: &mut ExerciseState,
        spec: &ExerciseSpec,
        working_weight: Weight,
        sets: &[SetOutcome],
    ) -> Option<f64> {
        if !self.progression_due(spec, working_weight, sets) {
            return None;
        }

        let next = self.progressed_weight(spec, working_weight)?;
        state.current_weight = Weight::Numeric(next);
        tracing::info!("Progression for {}: {} -> {}", spec.name, working_weight, next);
        Some(next)
    }
}
