//! Terminal screens for the application.

pub mod history;
pub mod home;
pub mod progress;
pub mod workout;

pub use history::{HistoryScreen, HISTORY_LIMIT};
pub use home::{HomeScreen, MENU_CHOICES};
pub use progress::ProgressScreen;
pub use workout::WorkoutScreen;

/// Screen navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Main menu
    #[default]
    Home,
    /// Running training session
    Workout,
    /// Stored session listing
    History,
    /// Current weights
    Progress,
}
