//! Application settings.
//!
//! Settings live in `<data>/settings.toml`. A missing file means defaults;
//! CLI flags override individual values after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Storage backend selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// YAML files (default)
    #[default]
    Files,
    /// SQLite database
    Sqlite,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Files => write!(f, "files"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub program: ProgramSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Configuration with defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

/// Storage-related settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Program-related settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSettings {
    /// Program definition file; `config.yaml` in the working directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "liftlog", "LiftLog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".liftlog"))
}

/// Load configuration from `<data_dir>/settings.toml`.
pub fn load_config(data_dir: &Path) -> Result<AppConfig, SettingsError> {
    let path = data_dir.join(SETTINGS_FILE);

    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Ok(AppConfig::with_data_dir(data_dir.to_path_buf()));
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| SettingsError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| SettingsError::ParseError(e.to_string()))?;

    config.data_dir = data_dir.to_path_buf();

    Ok(config)
}

/// Save configuration to its data directory.
pub fn save_config(config: &AppConfig) -> Result<(), SettingsError> {
    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| SettingsError::IoError(e.to_string()))?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| SettingsError::SerializeError(e.to_string()))?;

    std::fs::write(config.settings_path(), content)
        .map_err(|e| SettingsError::IoError(e.to_string()))?;

    Ok(())
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
