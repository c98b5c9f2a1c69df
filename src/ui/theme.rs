//! Terminal theme definitions.
//!
//! Styles are applied through `console`, which drops the escape codes when
//! the output is not a terminal.

use console::{Style, StyledObject};

/// Terminal styles for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub heading: Style,
    pub muted: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::new().blue().bold(),
            heading: Style::new().bold(),
            muted: Style::new().dim(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
        }
    }
}

impl Theme {
    /// Theme without any styling.
    pub fn plain() -> Self {
        Self {
            title: Style::new(),
            heading: Style::new(),
            muted: Style::new(),
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    pub fn title<D>(&self, text: D) -> StyledObject<D> {
        self.title.apply_to(text)
    }

    pub fn heading<D>(&self, text: D) -> StyledObject<D> {
        self.heading.apply_to(text)
    }

    pub fn muted<D>(&self, text: D) -> StyledObject<D> {
        self.muted.apply_to(text)
    }

    pub fn success<D>(&self, text: D) -> StyledObject<D> {
        self.success.apply_to(text)
    }

    pub fn warning<D>(&self, text: D) -> StyledObject<D> {
        self.warning.apply_to(text)
    }

    pub fn error<D>(&self, text: D) -> StyledObject<D> {
        self.error.apply_to(text)
    }
}
