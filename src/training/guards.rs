//! Session guards.
//!
//! Checked in a fixed order before a session starts:
//! 1. a record for today refuses the session
//! 2. a record for yesterday asks for confirmation
//! 3. three or more records since Monday ask for confirmation

use chrono::{Duration, NaiveDate};

use crate::storage::{HistoryStore, StoreError};

/// Sessions per calendar week before a warning is shown.
pub const WEEKLY_SESSION_LIMIT: usize = 3;

/// Soft warning that needs the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionWarning {
    /// A session was recorded for the previous day
    TrainedYesterday,
    /// The weekly limit is already reached
    WeeklyLimitReached { count: usize },
}

/// Guard state for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionGuards {
    pub trained_today: bool,
    pub trained_yesterday: bool,
    pub sessions_this_week: usize,
}

impl SessionGuards {
    /// Query the store for `today`. Stops after the refusal check when it trips.
    pub fn evaluate(store: &dyn HistoryStore, today: NaiveDate) -> Result<Self, StoreError> {
        if store.has_workout_on(today)? {
            return Ok(Self {
                trained_today: true,
                ..Self::default()
            });
        }

        let guards = Self {
            trained_today: false,
            trained_yesterday: store.has_workout_on(today - Duration::days(1))?,
            sessions_this_week: store.count_workouts_in_week(today)?,
        };
        tracing::debug!("Session guards for {}: {:?}", today, guards);
        Ok(guards)
    }

    /// A session already exists for today.
    pub fn refused(&self) -> bool {
        self.trained_today
    }

    /// Warnings to confirm, in the order they must be asked.
    pub fn warnings(&self) -> Vec<SessionWarning> {
        let mut warnings = Vec::new();
        if self.trained_yesterday {
            warnings.push(SessionWarning::TrainedYesterday);
        }
        if self.sessions_this_week >= WEEKLY_SESSION_LIMIT {
            warnings.push(SessionWarning::WeeklyLimitReached {
                count: self.sessions_this_week,
            });
        }
        warnings
    }
}
