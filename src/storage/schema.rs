//! Database schema definitions for LiftLog.
//!
//! Snapshot tables are overwritten as a whole; `snapshots` records which of
//! them has been saved at least once so an empty snapshot can be told apart
//! from a missing one.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Current prescribed weight per exercise
CREATE TABLE IF NOT EXISTS current_weights (
    exercise TEXT PRIMARY KEY,
    weight REAL,
    bodyweight INTEGER NOT NULL DEFAULT 0
);

-- Consecutive failed sets per exercise
CREATE TABLE IF NOT EXISTS failure_streaks (
    exercise TEXT PRIMARY KEY,
    streak INTEGER NOT NULL DEFAULT 0
);

-- Saved snapshot markers
CREATE TABLE IF NOT EXISTS snapshots (
    name TEXT PRIMARY KEY,
    saved_at TEXT NOT NULL
);

-- One workout record per calendar date
CREATE TABLE IF NOT EXISTS workouts (
    date TEXT PRIMARY KEY,
    time TEXT NOT NULL,
    workout TEXT NOT NULL,
    exercises_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Schema version table
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;

/// Snapshot marker for the weights table
pub const WEIGHTS_SNAPSHOT: &str = "current_weights";

/// Snapshot marker for the streaks table
pub const STREAKS_SNAPSHOT: &str = "failure_streaks";
