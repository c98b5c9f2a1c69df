//! Progress screen: current against starting weight per exercise.

use crate::program::{format_load, Weight};
use crate::training::TrainingSession;
use crate::ui::table::TextTable;
use crate::ui::theme::Theme;

/// Progress label: signed difference, or `N/A` when either side is bodyweight.
pub fn progress_label(current: Weight, starting: Weight, unit: &str) -> String {
    match (current, starting) {
        (Weight::Numeric(current), Weight::Numeric(starting)) => {
            let diff = current - starting;
            if diff < 0.0 {
                format!("-{} {}", format_load(-diff), unit)
            } else {
                format!("+{} {}", format_load(diff), unit)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Current weights in program declaration order.
pub struct ProgressScreen;

impl ProgressScreen {
    pub fn render(theme: &Theme, session: &TrainingSession) -> Vec<String> {
        let unit = &session.program().rounding.unit;
        let mut table =
            TextTable::new(["Exercise", "Current Weight", "Starting Weight", "Progress"]);

        for (spec, current) in session.progress() {
            table.add_row([
                spec.display_name(),
                current.to_string(),
                spec.starting_weight.to_string(),
                progress_label(current, spec.starting_weight, unit),
            ]);
        }

        let mut lines = vec![theme.heading("Current Weights").to_string(), String::new()];
        lines.extend(table.render());
        lines
    }
}
