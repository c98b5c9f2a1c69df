//! Main application loop.
//!
//! Owns the training session, the history store and the prompter, and moves
//! between the home menu and the other screens until the user quits or input
//! ends.

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};

use crate::program::{LoadedProgram, ProgramSource};
use crate::storage::{AppConfig, HistoryStore};
use crate::training::{SessionOutcome, TrainingSession, WorkoutRecorder};
use crate::ui::screens::{
    HistoryScreen, HomeScreen, ProgressScreen, Screen, WorkoutScreen, HISTORY_LIMIT, MENU_CHOICES,
};
use crate::ui::{PromptError, Prompter, Theme};

/// Source of the current local date and time.
pub type Clock = Box<dyn Fn() -> NaiveDateTime>;

/// Interactive application state.
pub struct App<R, W> {
    config: AppConfig,
    session: TrainingSession,
    store: Box<dyn HistoryStore>,
    prompter: Prompter<R, W>,
    theme: Theme,
    clock: Clock,
    clear_screen: bool,
    current_screen: Screen,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Create the application and load training state from the store.
    ///
    /// Missing or incomplete snapshots are initialized and written back.
    pub fn new(
        config: AppConfig,
        program: LoadedProgram,
        store: Box<dyn HistoryStore>,
        prompter: Prompter<R, W>,
        theme: Theme,
    ) -> anyhow::Result<Self> {
        let LoadedProgram {
            program,
            source,
            warning,
        } = program;
        if let ProgramSource::File(path) = &source {
            tracing::debug!("Program file: {}", path.display());
        }

        let loaded = TrainingSession::load(program, store.as_ref());
        let mut app = Self {
            config,
            session: loaded.session,
            store,
            prompter,
            theme,
            clock: Box::new(|| Local::now().naive_local()),
            clear_screen: false,
            current_screen: Screen::Home,
        };

        if let Some(e) = warning {
            let line = app
                .theme
                .warning(format!("{}. Using the built-in program.", e));
            app.prompter.say(line)?;
        }
        for e in &loaded.warnings {
            let line = app
                .theme
                .warning(format!("{}. Starting from default weights.", e));
            app.prompter.say(line)?;
        }

        if loaded.needs_save {
            for e in app.session.persist(app.store.as_mut(), None) {
                let line = app.theme.error(format!("Save failed: {}", e));
                app.prompter.say(line)?;
            }
        }

        Ok(app)
    }

    /// Replace the clock used to date sessions.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Clear the terminal before drawing each screen.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn store(&self) -> &dyn HistoryStore {
        self.store.as_ref()
    }

    /// Consume the application and return the prompter's output.
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    fn navigate(&mut self, screen: Screen) {
        tracing::debug!("Navigating from {:?} to {:?}", self.current_screen, screen);
        self.current_screen = screen;
    }

    fn clear(&self) {
        if self.clear_screen {
            if let Err(e) = console::Term::stdout().clear_screen() {
                tracing::debug!("Could not clear screen: {}", e);
            }
        }
    }

    /// Run the menu loop until the user quits or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.navigate(Screen::Home);
            self.clear();
            let banner = HomeScreen::banner(&self.theme, &self.session.program().program.name);
            self.prompter.say_all(banner)?;
            self.prompter.say("")?;
            self.prompter.say_all(HomeScreen::menu())?;
            self.prompter.say("")?;

            let choice = match self.prompter.choose("Choose an option", &MENU_CHOICES) {
                Ok(choice) => choice,
                Err(PromptError::Aborted) | Err(PromptError::Closed) => break,
                Err(e) => return Err(e.into()),
            };
            let Some(screen) = HomeScreen::parse_choice(&choice) else {
                break;
            };

            self.navigate(screen);
            self.clear();
            match screen {
                Screen::Workout => self.start_workout()?,
                Screen::History => self.view_history()?,
                Screen::Progress => self.view_progress()?,
                Screen::Home => {}
            }

            match self.prompter.pause() {
                Ok(()) => {}
                Err(PromptError::Closed) => break,
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!("Exiting");
        self.prompter.say(self.theme.success("\nGoodbye."))?;
        Ok(())
    }

    /// Run one training session and save it.
    pub fn start_workout(&mut self) -> anyhow::Result<()> {
        let now = (self.clock)();
        let unit = self.session.program().rounding.unit.clone();

        let title = self.theme.title("LiftLog");
        self.prompter.say(title)?;
        self.prompter.say(&self.session.program().program.name)?;

        let mut screen = WorkoutScreen::new(&mut self.prompter, &self.theme, &unit);
        let outcome = WorkoutRecorder::new(&mut self.session, self.store.as_mut())
            .run(&mut screen, now)
            .context("Workout could not be started")?;
        screen.show_outcome(&outcome);

        if let SessionOutcome::Completed(completed) = outcome {
            let mut errors = completed.save_errors;
            while !errors.is_empty() {
                if !self.prompter.confirm("Retry saving?", Some(true))? {
                    let line = self
                        .theme
                        .warning("Workout record not saved. Weights stay in memory until the next successful save.");
                    self.prompter.say(line)?;
                    break;
                }
                errors = self
                    .session
                    .persist(self.store.as_mut(), Some(&completed.record));
                for e in &errors {
                    let line = self.theme.error(format!("Save failed: {}", e));
                    self.prompter.say(line)?;
                }
            }
        }
        Ok(())
    }

    /// Show the most recent sessions.
    pub fn view_history(&mut self) -> anyhow::Result<()> {
        let entries = self
            .store
            .recent_workouts(HISTORY_LIMIT)
            .context("Could not list workout history")?;
        let lines = HistoryScreen::render(&self.theme, &entries);
        self.prompter.say_all(lines)?;
        Ok(())
    }

    /// Show current weights against starting weights.
    pub fn view_progress(&mut self) -> anyhow::Result<()> {
        let lines = ProgressScreen::render(&self.theme, &self.session);
        self.prompter.say_all(lines)?;
        Ok(())
    }
}
