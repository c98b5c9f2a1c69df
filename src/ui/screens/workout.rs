//! Workout screen: terminal implementation of the session port.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::program::{display_name, format_load, ExerciseSpec, Weight, WorkoutGroup};
use crate::training::{
    SessionAborted, SessionIo, SessionOutcome, SessionWarning, SetInput, SetOutcome, SetPrompt,
    SetTransition, WarmupSet,
};
use crate::ui::prompt::{parse_reps, parse_weight, PromptError, Prompter};
use crate::ui::theme::Theme;

/// Drives a training session through terminal prompts.
pub struct WorkoutScreen<'a, R, W> {
    prompter: &'a mut Prompter<R, W>,
    theme: &'a Theme,
    unit: String,
}

impl<'a, R: BufRead, W: Write> WorkoutScreen<'a, R, W> {
    pub fn new(prompter: &'a mut Prompter<R, W>, theme: &'a Theme, unit: &str) -> Self {
        Self {
            prompter,
            theme,
            unit: unit.to_string(),
        }
    }

    fn show(&mut self, line: impl Display) {
        if let Err(e) = self.prompter.say(line) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    fn load(&self, value: f64) -> String {
        format!("{} {}", format_load(value), self.unit)
    }

    /// Print how a session request ended.
    pub fn show_outcome(&mut self, outcome: &SessionOutcome) {
        match outcome {
            SessionOutcome::Refused => {
                let line = self
                    .theme
                    .error("You have already worked out today. Rest is important.");
                self.show(line);
            }
            SessionOutcome::Declined(_) => {
                let line = self.theme.muted("Workout not started.");
                self.show(line);
            }
            SessionOutcome::Aborted => {
                let line = self.theme.warning("\nWorkout aborted. Nothing was saved.");
                self.show(line);
            }
            SessionOutcome::Completed(completed) => {
                if completed.saved() {
                    let line = self
                        .theme
                        .success(format!("\nWorkout saved for {}", completed.record.date));
                    self.show(line);
                } else {
                    for e in &completed.save_errors {
                        let line = self.theme.error(format!("\nSave failed: {}", e));
                        self.show(line);
                    }
                }
            }
        }
    }
}

fn interrupted(e: PromptError) -> SessionAborted {
    if let PromptError::Io(err) = &e {
        tracing::warn!("Input error, aborting session: {}", err);
    }
    SessionAborted
}

impl<'a, R: BufRead, W: Write> SessionIo for WorkoutScreen<'a, R, W> {
    fn confirm_warning(&mut self, warning: SessionWarning) -> Result<bool, SessionAborted> {
        let (message, question) = match warning {
            SessionWarning::TrainedYesterday => (
                "You worked out yesterday. One rest day is recommended.".to_string(),
                "Are you sure you want to workout today?",
            ),
            SessionWarning::WeeklyLimitReached { count } => (
                format!("You have already completed {} workouts this week.", count),
                "Are you sure you want to continue?",
            ),
        };
        let line = self.theme.warning(message);
        self.show(line);
        self.prompter
            .confirm(question, Some(false))
            .map_err(interrupted)
    }

    fn workout_started(&mut self, workout: WorkoutGroup, exercises: &[String]) {
        let line = self.theme.heading(format!("\nToday's workout: {}", workout));
        self.show(line);
        let line = self
            .theme
            .muted(format!("Exercises: {}", exercises.join(", ")));
        self.show(line);
    }

    fn exercise_started(&mut self, spec: &ExerciseSpec, weight: Weight, warmups: &[WarmupSet]) {
        let line = self.theme.heading(format!("\n{}", spec.display_name()));
        self.show(line);

        match weight {
            Weight::Bodyweight => self.show("Current: Bodyweight"),
            Weight::Numeric(value) => {
                let line = format!("Current weight: {}", self.load(value));
                self.show(line);
            }
        }

        if !warmups.is_empty() {
            self.show("\nWarmup sets:");
            for (i, set) in warmups.iter().enumerate() {
                let line = format!("  {}. {} × {}", i + 1, self.load(set.weight), set.reps);
                self.show(line);
            }
        }

        self.show(format!("\nWorking sets: {} × {}", spec.sets, spec.reps));
    }

    fn record_set(&mut self, prompt: &SetPrompt<'_>) -> Result<SetInput, SessionAborted> {
        self.show(format!("\nSet {}:", prompt.set));

        let weight = match prompt.weight {
            Weight::Bodyweight => Weight::Bodyweight,
            prescribed => {
                let question = format!("Weight ({})", self.unit);
                let answer = self
                    .prompter
                    .ask(&question, Some(&prescribed.to_string()))
                    .map_err(interrupted)?;
                parse_weight(&answer, prescribed)
            }
        };

        let target = prompt.exercise.reps;
        let answer = self
            .prompter
            .ask("Reps completed", Some(&target.to_string()))
            .map_err(interrupted)?;

        Ok(SetInput {
            weight,
            reps: parse_reps(&answer, target),
        })
    }

    fn set_recorded(&mut self, _outcome: &SetOutcome, transition: &SetTransition) {
        match *transition {
            SetTransition::Success { streak_cleared } => {
                let line = self.theme.success("Good set.");
                self.show(line);
                if streak_cleared {
                    let line = self.theme.success("Failure streak reset.");
                    self.show(line);
                }
            }
            SetTransition::Failed {
                streak,
                stalling_attempts,
            } => {
                let line = self.theme.error("Failed set.");
                self.show(line);
                let line = self
                    .theme
                    .warning(format!("Failure streak: {}/{}", streak, stalling_attempts));
                self.show(line);
            }
            SetTransition::Deload { to, .. } => {
                let line = self.theme.error("Failed set.");
                self.show(line);
                let line = self.theme.warning(format!(
                    "Automatic deload: Weight reduced to {}",
                    self.load(to)
                ));
                self.show(line);
                let line = self.theme.muted("The new weight applies from the next session.");
                self.show(line);
            }
            SetTransition::DeloadNotApplicable { .. } => {
                let line = self.theme.error("Failed set.");
                self.show(line);
                let line = self
                    .theme
                    .warning("Deload not applicable for bodyweight exercise.");
                self.show(line);
            }
        }
    }

    fn confirm_progression(
        &mut self,
        spec: &ExerciseSpec,
        from: Weight,
        to: f64,
    ) -> Result<bool, SessionAborted> {
        let question = format!(
            "Increase weight by {} ({} → {})?",
            self.load(spec.progression),
            from,
            self.load(to)
        );
        self.prompter
            .confirm(&question, Some(true))
            .map_err(interrupted)
    }

    fn progression_applied(&mut self, spec: &ExerciseSpec, to: f64) {
        let line = self.theme.success(format!(
            "{} weight increased to {}",
            display_name(&spec.name),
            self.load(to)
        ));
        self.show(line);
    }
}
