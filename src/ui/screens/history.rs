//! Workout history screen.

use crate::storage::HistoryEntry;
use crate::ui::table::TextTable;
use crate::ui::theme::Theme;

/// Number of most recent records listed.
pub const HISTORY_LIMIT: usize = 20;

/// Newest-first listing of stored sessions.
pub struct HistoryScreen;

impl HistoryScreen {
    /// Render entries as a table followed by one line per unreadable record.
    pub fn render(theme: &Theme, entries: &[HistoryEntry]) -> Vec<String> {
        let mut lines = vec![theme.heading("Workout History").to_string(), String::new()];

        if entries.is_empty() {
            lines.push(theme.warning("No workout entries found.").to_string());
            return lines;
        }

        let mut table = TextTable::new(["Date", "Workout", "Exercises", "Status"]);
        let mut errors = Vec::new();
        for entry in entries {
            match &entry.record {
                Ok(record) => {
                    let status = if record.is_complete() { "✓" } else { "✗" };
                    table.add_row([
                        record.date.to_string(),
                        record.workout.to_string(),
                        format!("{} exercises", record.exercise_count()),
                        status.to_string(),
                    ]);
                }
                Err(e) => {
                    errors.push(theme.error(format!("Error reading {}: {}", entry.date, e)).to_string());
                }
            }
        }

        if !table.is_empty() {
            lines.extend(table.render());
        }
        lines.extend(errors);
        lines
    }
}
