pub mod config;
pub mod json_dir;
pub mod models;
pub mod schema;
pub mod sqlite;

use setlist_config::{ConfigError, PATHS, SetlistPaths};
use setlist_core::ports::{KeyValueStore, StoreError};
use tracing::info;

pub use config::{BackendKind, StorageConfig};
pub use json_dir::JsonDirStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("config error: {0}")]
  Config(#[from] ConfigError),
  #[error(transparent)]
  Store(#[from] StoreError),
}

/// The key-value backend selected in `[storage]`.
pub enum StoreBackend {
  Sqlite(SqliteStore),
  Json(JsonDirStore),
}

impl StoreBackend {
  pub fn open(cfg: &StorageConfig, paths: &SetlistPaths) -> Result<Self, StoreError> {
    match cfg.backend {
      BackendKind::Sqlite => {
        let db_path = cfg.resolved_db_path(paths);
        info!(path = %db_path.display(), "opening sqlite store");
        let url = db_path.to_string_lossy();
        Ok(StoreBackend::Sqlite(SqliteStore::open(&url, cfg.journal_mode.as_deref())?))
      }
      BackendKind::Json => {
        let dir = cfg.resolved_json_dir(paths);
        info!(dir = %dir.display(), "opening json store");
        Ok(StoreBackend::Json(JsonDirStore::open(dir)?))
      }
    }
  }

  /// Reads `[storage]` from the global config and opens the matching backend.
  pub fn new_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Ok(Self::open(&cfg, &PATHS)?)
  }
}

impl KeyValueStore for StoreBackend {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    match self {
      StoreBackend::Sqlite(s) => s.get(key),
      StoreBackend::Json(s) => s.get(key),
    }
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    match self {
      StoreBackend::Sqlite(s) => s.set(key, value),
      StoreBackend::Json(s) => s.set(key, value),
    }
  }
}
