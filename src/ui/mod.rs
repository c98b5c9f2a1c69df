//! UI module for the terminal user interface.

pub mod prompt;
pub mod screens;
pub mod table;
pub mod theme;

pub use prompt::{PromptError, Prompter};
pub use screens::Screen;
pub use table::TextTable;
pub use theme::Theme;
