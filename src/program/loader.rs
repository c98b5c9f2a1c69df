//! Program definition loading.
//!
//! Reads the YAML program file, falling back to the built-in program when the
//! file is absent or unusable.

use std::path::{Path, PathBuf};

use super::defaults::default_program;
use super::types::{ConfigError, ProgramDefinition};

/// Program file looked up in the working directory when none is configured.
pub const DEFAULT_PROGRAM_FILE: &str = "config.yaml";

/// Where the active program came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    /// Loaded from a file
    File(PathBuf),
    /// Built-in default program
    BuiltIn,
}

/// Result of program loading. Never fails; problems are carried as a warning.
#[derive(Debug)]
pub struct LoadedProgram {
    pub program: ProgramDefinition,
    pub source: ProgramSource,
    /// Set when a program file existed but could not be used
    pub warning: Option<ConfigError>,
}

/// Parse and validate a YAML program definition.
pub fn parse_program(content: &str) -> Result<ProgramDefinition, ConfigError> {
    let program: ProgramDefinition =
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    program.validate()?;
    Ok(program)
}

/// Read a program definition from a file.
pub fn load_program_file(path: &Path) -> Result<ProgramDefinition, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_program(&content)
}

/// Load the program, or the built-in default.
///
/// `path` is an explicitly configured file; without one the default file in
/// the working directory is tried. An explicit path that does not exist is
/// reported as a warning, a missing default file is not.
pub fn load_program(path: Option<&Path>) -> LoadedProgram {
    let explicit = path.is_some();
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILE));

    if !path.exists() {
        let warning = explicit.then(|| ConfigError::ReadFailed {
            path: path.clone(),
            reason: "file not found".to_string(),
        });
        if let Some(warning) = &warning {
            tracing::warn!("{}; using built-in program", warning);
        } else {
            tracing::info!("No program file found, using built-in program");
        }
        return builtin(warning);
    }

    match load_program_file(&path) {
        Ok(program) => {
            tracing::info!(
                "Loaded program '{}' from {}",
                program.program.name,
                path.display()
            );
            LoadedProgram {
                program,
                source: ProgramSource::File(path),
                warning: None,
            }
        }
        Err(e) => {
            tracing::warn!("Could not load {}: {}; using built-in program", path.display(), e);
            builtin(Some(e))
        }
    }
}

fn builtin(warning: Option<ConfigError>) -> LoadedProgram {
    LoadedProgram {
        program: default_program(),
        source: ProgramSource::BuiltIn,
        warning,
    }
}
