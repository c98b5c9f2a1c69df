//! Workout scheduling.
//!
//! The A/B group is a pure function of the calendar date: weeks since the
//! Unix epoch alternate between the two groups, so missed sessions never
//! shift the cycle and no "next workout" pointer is stored.

use chrono::{Datelike, Duration, NaiveDate};

use crate::program::{ProgramDefinition, WorkoutGroup};

/// Day number of 1970-01-01 counted from 0001-01-01 (day 1).
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Whole days between the Unix epoch and `date` (negative before 1970).
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE
}

/// Weeks since the epoch, flooring towards negative infinity.
pub fn week_number(date: NaiveDate) -> i64 {
    days_since_epoch(date).div_euclid(7)
}

/// Workout group due on `date`.
pub fn workout_for(date: NaiveDate) -> WorkoutGroup {
    if week_number(date).rem_euclid(2) == 0 {
        WorkoutGroup::WeekA
    } else {
        WorkoutGroup::WeekB
    }
}

/// Exercises due on `date`: the group's list followed by the bonus list.
///
/// Names present in both lists appear twice.
pub fn exercises_for(date: NaiveDate, program: &ProgramDefinition) -> Vec<String> {
    let group = workout_for(date);
    program
        .workouts
        .group(group)
        .iter()
        .chain(program.bonus_exercises.iter())
        .cloned()
        .collect()
}

/// Monday of the calendar week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
