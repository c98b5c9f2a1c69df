//! Line-based prompts.
//!
//! `Prompter` reads answers from any `BufRead` and writes questions to any
//! `Write`, so scripted input can drive the whole application in tests.
//! Typing `abort` or `cancel` at any prompt cancels the current action.

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use thiserror::Error;

use crate::program::Weight;

/// Words that cancel the current action.
pub const ABORT_WORDS: [&str; 2] = ["abort", "cancel"];

/// Prompt errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user typed an abort word
    #[error("Cancelled by user")]
    Aborted,

    /// Input reached end of file
    #[error("Input closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Asks questions and reads answers line by line.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return its output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line.
    pub fn say(&mut self, line: impl Display) -> Result<(), PromptError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Write several lines.
    pub fn say_all<I, D>(&mut self, lines: I) -> Result<(), PromptError>
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    fn read_answer(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }

        let answer = line.trim().to_string();
        if ABORT_WORDS
            .iter()
            .any(|word| answer.eq_ignore_ascii_case(word))
        {
            return Err(PromptError::Aborted);
        }
        Ok(answer)
    }

    /// Ask a free-form question; an empty answer takes the default.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, PromptError> {
        match default {
            Some(default) => write!(self.output, "{} ({}): ", question, default)?,
            None => write!(self.output, "{}: ", question)?,
        }

        let answer = self.read_answer()?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    /// Ask a yes/no question, repeating until the answer is understood.
    pub fn confirm(&mut self, question: &str, default: Option<bool>) -> Result<bool, PromptError> {
        let hint = match default {
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
            None => "[y/n]",
        };

        loop {
            write!(self.output, "{} {}: ", question, hint)?;
            let answer = self.read_answer()?.to_lowercase();
            match (answer.as_str(), default) {
                ("y" | "yes", _) => return Ok(true),
                ("n" | "no", _) => return Ok(false),
                ("", Some(default)) => return Ok(default),
                _ => writeln!(self.output, "Please enter Y or N")?,
            }
        }
    }

    /// Ask until the answer is one of `choices`.
    pub fn choose(&mut self, question: &str, choices: &[&str]) -> Result<String, PromptError> {
        loop {
            write!(self.output, "{} [{}]: ", question, choices.join("/"))?;
            let answer = self.read_answer()?;
            if choices.contains(&answer.as_str()) {
                return Ok(answer);
            }
            writeln!(self.output, "Please select one of the available options")?;
        }
    }

    /// Wait for Enter.
    pub fn pause(&mut self) -> Result<(), PromptError> {
        write!(self.output, "\nPress Enter to continue...")?;
        match self.read_answer() {
            Ok(_) | Err(PromptError::Aborted) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Parse a rep count; anything but a non-negative integer keeps the default.
pub fn parse_reps(input: &str, default: u32) -> u32 {
    input.trim().parse().unwrap_or(default)
}

/// Parse a weight entry; unparseable input keeps the default.
pub fn parse_weight(input: &str, default: Weight) -> Weight {
    Weight::parse(input).unwrap_or(default)
}
