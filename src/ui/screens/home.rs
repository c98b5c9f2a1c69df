//! Home screen: banner and main menu.

use super::Screen;
use crate::ui::theme::Theme;

/// Application title shown in the banner.
pub const APP_TITLE: &str = "LiftLog";

/// Accepted menu answers.
pub const MENU_CHOICES: [&str; 4] = ["1", "2", "3", "q"];

/// Main menu.
pub struct HomeScreen;

impl HomeScreen {
    /// Banner with the program name.
    pub fn banner(theme: &Theme, program_name: &str) -> Vec<String> {
        let width = APP_TITLE.len().max(program_name.chars().count()) + 2;
        let rule = "─".repeat(width);
        vec![
            format!("┌{}┐", rule),
            format!("│ {:<w$} │", theme.title(APP_TITLE), w = width - 2),
            format!("│ {:<w$} │", program_name, w = width - 2),
            format!("└{}┘", rule),
        ]
    }

    /// Menu entries.
    pub fn menu() -> Vec<String> {
        [
            ("[1]", "Start Workout"),
            ("[2]", "View History"),
            ("[3]", "View Progress"),
            ("[q]", "Quit"),
        ]
        .iter()
        .map(|(key, label)| format!("{} {}", key, label))
        .collect()
    }

    /// Map a menu answer to the next screen. `None` quits.
    pub fn parse_choice(choice: &str) -> Option<Screen> {
        match choice {
            "1" => Some(Screen::Workout),
            "2" => Some(Screen::History),
            "3" => Some(Screen::Progress),
            _ => None,
        }
    }
}
