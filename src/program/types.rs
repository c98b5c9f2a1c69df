//! Program definition types.
//!
//! Defines Weight, ExerciseSpec, ExerciseCatalog and ProgramDefinition
//! Defines DeloadPolicy and RoundingPolicy
//! Defines ConfigError

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Persisted label for a bodyweight load.
pub const BODYWEIGHT_LABEL: &str = "bodyweight";

/// A training load.
///
/// Arithmetic is only defined on `Numeric`; bodyweight movements carry no
/// external load and are exempt from rounding, progression and deload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    /// External load in the program's unit
    Numeric(f64),
    /// No external load
    Bodyweight,
}

impl Weight {
    /// Create a numeric weight.
    pub fn kg(value: f64) -> Self {
        Weight::Numeric(value)
    }

    /// Check if this is a bodyweight load.
    pub fn is_bodyweight(&self) -> bool {
        matches!(self, Weight::Bodyweight)
    }

    /// Get the numeric value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Weight::Numeric(value) => Some(*value),
            Weight::Bodyweight => None,
        }
    }

    /// Parse user or file input. Accepts numbers and the bodyweight label.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(BODYWEIGHT_LABEL) {
            return Some(Weight::Bodyweight);
        }
        input
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Weight::Numeric)
    }
}

/// Format a numeric load without trailing zeros (60, 62.5, 52.25).
pub fn format_load(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let formatted = format!("{:.2}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Numeric(value) => write!(f, "{}", format_load(*value)),
            Weight::Bodyweight => write!(f, "Bodyweight"),
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            // Whole loads are written as integers to keep the files readable
            Weight::Numeric(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                serializer.serialize_i64(value as i64)
            }
            Weight::Numeric(value) => serializer.serialize_f64(value),
            Weight::Bodyweight => serializer.serialize_str(BODYWEIGHT_LABEL),
        }
    }
}

struct WeightVisitor;

impl<'de> Visitor<'de> for WeightVisitor {
    type Value = Weight;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number or the string \"{}\"", BODYWEIGHT_LABEL)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Weight, E> {
        Ok(Weight::Numeric(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Weight, E> {
        Ok(Weight::Numeric(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Weight, E> {
        Ok(Weight::Numeric(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Weight, E> {
        Weight::parse(value).ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WeightVisitor)
    }
}

/// Static description of one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    /// Unique exercise name (the key in the program's exercise mapping)
    #[serde(skip)]
    pub name: String,
    /// Prescribed weight on first run
    pub starting_weight: Weight,
    /// Weight added after a fully successful block (0 disables progression)
    #[serde(default)]
    pub progression: f64,
    /// Number of working sets
    pub sets: u32,
    /// Target reps per working set
    pub reps: u32,
    /// Skip the warm-up ramp
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_warmup: bool,
}

impl ExerciseSpec {
    /// Create an exercise spec.
    pub fn new(name: &str, starting_weight: Weight, progression: f64, sets: u32, reps: u32) -> Self {
        Self {
            name: name.to_string(),
            starting_weight,
            progression,
            sets,
            reps,
            no_warmup: false,
        }
    }

    /// Mark the exercise as having no warm-up sets.
    pub fn without_warmup(mut self) -> Self {
        self.no_warmup = true;
        self
    }

    /// Human readable name ("bench_press" -> "Bench Press").
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

/// Convert a snake_case exercise key into a title.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exercises keyed by unique name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseSpec>,
}

impl ExerciseCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn from_specs(specs: Vec<ExerciseSpec>) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    /// Build a catalog from names already known to be unique.
    pub(crate) fn from_unique_specs(exercises: Vec<ExerciseSpec>) -> Self {
        Self { exercises }
    }

    fn insert(&mut self, spec: ExerciseSpec) -> Result<(), ConfigError> {
        if self.get(&spec.name).is_some() {
            return Err(ConfigError::Invalid(format!(
                "Duplicate exercise '{}'",
                spec.name
            )));
        }
        self.exercises.push(spec);
        Ok(())
    }

    /// Look up an exercise by name.
    pub fn get(&self, name: &str) -> Option<&ExerciseSpec> {
        self.exercises.iter().find(|spec| spec.name == name)
    }

    /// Iterate exercises in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ExerciseSpec> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl Serialize for ExerciseCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.exercises.len()))?;
        for spec in &self.exercises {
            map.serialize_entry(&spec.name, spec)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = ExerciseCatalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a mapping of exercise names to exercise definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ExerciseCatalog, A::Error> {
        let mut catalog = ExerciseCatalog::default();
        while let Some((name, mut spec)) = access.next_entry::<String, ExerciseSpec>()? {
            spec.name = name;
            catalog.insert(spec).map_err(de::Error::custom)?;
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for ExerciseCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// One of the two alternating workout groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutGroup {
    #[serde(rename = "week_A")]
    WeekA,
    #[serde(rename = "week_B")]
    WeekB,
}

impl WorkoutGroup {
    /// Persisted label.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutGroup::WeekA => "week_A",
            WorkoutGroup::WeekB => "week_B",
        }
    }

    /// Parse a persisted label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "week_A" => Some(WorkoutGroup::WeekA),
            "week_B" => Some(WorkoutGroup::WeekB),
            _ => None,
        }
    }
}

impl fmt::Display for WorkoutGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Exercise lists of both workout groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workouts {
    #[serde(rename = "week_A")]
    pub week_a: Vec<String>,
    #[serde(rename = "week_B")]
    pub week_b: Vec<String>,
}

impl Workouts {
    /// Exercise names of a group.
    pub fn group(&self, group: WorkoutGroup) -> &[String] {
        match group {
            WorkoutGroup::WeekA => &self.week_a,
            WorkoutGroup::WeekB => &self.week_b,
        }
    }
}

/// Preferred training days (1 = Monday .. 7 = Sunday). Informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDays {
    pub days: Vec<u8>,
}

impl Default for TrainingDays {
    fn default() -> Self {
        Self {
            // Tue/Thu/Sun
            days: vec![2, 4, 7],
        }
    }
}

/// Program metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInfo {
    #[serde(default = "default_program_name")]
    pub name: String,
    #[serde(default = "default_program_description")]
    pub description: String,
    #[serde(default)]
    pub schedule: TrainingDays,
    #[serde(default = "default_cycle")]
    pub cycle: Vec<WorkoutGroup>,
}

fn default_program_name() -> String {
    "Starting Strength Program".to_string()
}

fn default_program_description() -> String {
    "Classic Starting Strength linear progression".to_string()
}

fn default_cycle() -> Vec<WorkoutGroup> {
    vec![WorkoutGroup::WeekA, WorkoutGroup::WeekB]
}

impl Default for ProgramInfo {
    fn default() -> Self {
        Self {
            name: default_program_name(),
            description: default_program_description(),
            schedule: TrainingDays::default(),
            cycle: default_cycle(),
        }
    }
}

/// When and how far to reduce a stalled weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeloadPolicy {
    /// Consecutive failed sets that trigger a deload
    pub stalling_attempts: u32,
    /// Reduction in percent of the working weight (0-100)
    pub reduce_percent: f64,
}

impl Default for DeloadPolicy {
    fn default() -> Self {
        Self {
            stalling_attempts: 3,
            reduce_percent: 10.0,
        }
    }
}

/// Rounds loads to the nearest loadable increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingPolicy {
    /// Smallest loadable step
    pub increment: f64,
    /// Display unit
    pub unit: String,
}

fn default_unit() -> String {
    "kg".to_string()
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            increment: 2.5,
            unit: default_unit(),
        }
    }
}

impl RoundingPolicy {
    /// Round a weight to the nearest increment. Bodyweight is returned unchanged.
    pub fn round(&self, weight: Weight) -> Weight {
        match weight {
            Weight::Numeric(value) => Weight::Numeric(self.round_value(value)),
            Weight::Bodyweight => Weight::Bodyweight,
        }
    }

    /// Round a numeric load. Ties go to the even multiple (22.5 steps -> 22).
    pub fn round_value(&self, value: f64) -> f64 {
        (value / self.increment).round_ties_even() * self.increment
    }
}

/// Complete static program description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDefinition {
    #[serde(default)]
    pub program: ProgramInfo,
    pub exercises: ExerciseCatalog,
    pub workouts: Workouts,
    #[serde(default)]
    pub bonus_exercises: Vec<String>,
    #[serde(default)]
    pub deload: DeloadPolicy,
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl ProgramDefinition {
    /// Look up an exercise by name.
    pub fn exercise(&self, name: &str) -> Option<&ExerciseSpec> {
        self.exercises.get(name)
    }

    /// Check cross references and policy ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exercises.is_empty() {
            return Err(ConfigError::Invalid("No exercises defined".to_string()));
        }

        for spec in self.exercises.iter() {
            if spec.sets == 0 || spec.reps == 0 {
                return Err(ConfigError::Invalid(format!(
                    "Exercise '{}' needs at least one set and one rep",
                    spec.name
                )));
            }
            if !spec.progression.is_finite() || spec.progression < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "Exercise '{}' has a negative progression",
                    spec.name
                )));
            }
            match spec.starting_weight {
                Weight::Numeric(value) if !value.is_finite() || value < 0.0 => {
                    return Err(ConfigError::Invalid(format!(
                        "Exercise '{}' has an invalid starting weight",
                        spec.name
                    )));
                }
                Weight::Bodyweight if spec.progression != 0.0 => {
                    return Err(ConfigError::Invalid(format!(
                        "Bodyweight exercise '{}' must have progression 0",
                        spec.name
                    )));
                }
                _ => {}
            }
        }

        let references = [
            (WorkoutGroup::WeekA.label(), self.workouts.week_a.as_slice()),
            (WorkoutGroup::WeekB.label(), self.workouts.week_b.as_slice()),
            ("bonus_exercises", self.bonus_exercises.as_slice()),
        ];
        for (context, names) in references {
            if let Some(name) = names.iter().find(|name| self.exercise(name).is_none()) {
                return Err(ConfigError::UnknownExercise {
                    name: name.clone(),
                    context: context.to_string(),
                });
            }
        }

        if self.deload.stalling_attempts == 0 {
            return Err(ConfigError::Invalid(
                "deload.stalling_attempts must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.deload.reduce_percent) {
            return Err(ConfigError::Invalid(
                "deload.reduce_percent must be between 0 and 100".to_string(),
            ));
        }
        if !self.rounding.increment.is_finite() || self.rounding.increment <= 0.0 {
            return Err(ConfigError::Invalid(
                "rounding.increment must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors related to the program definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Program file could not be read
    #[error("Failed to read program file {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    /// Program file is not valid YAML for the schema
    #[error("Failed to parse program definition: {0}")]
    ParseError(String),

    /// A workout list names an exercise that is not defined
    #[error("Unknown exercise '{name}' referenced in {context}")]
    UnknownExercise { name: String, context: String },

    /// Semantically invalid definition
    #[error("Invalid program definition: {0}")]
    Invalid(String),
}
