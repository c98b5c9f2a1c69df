//! Storage module for history stores and settings.

pub mod config;
pub mod database;
pub mod files;
pub mod history;
pub mod schema;

pub use config::{AppConfig, SettingsError, StorageBackend};
pub use database::{DatabaseError, SqliteHistoryStore, DATABASE_FILE};
pub use files::FileHistoryStore;
pub use history::{
    HistoryEntry, HistoryStore, MemoryHistoryStore, StoreError, StreakSnapshot, WeightSnapshot,
};

/// Open the history store selected in the configuration.
pub fn open_store(config: &AppConfig) -> Result<Box<dyn HistoryStore>, StoreError> {
    match config.storage.backend {
        StorageBackend::Files => {
            let store = FileHistoryStore::open(&config.data_dir)?;
            Ok(Box::new(store))
        }
        StorageBackend::Sqlite => {
            let store = SqliteHistoryStore::open(&config.data_dir.join(DATABASE_FILE))?;
            Ok(Box::new(store))
        }
    }
}
