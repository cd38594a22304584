use setlist_config::{CONFIG_BACKEND, ConfigError, SetlistPaths, TomlConfigBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECTION: &str = "storage";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
  #[default]
  Sqlite,
  Json,
}

/// Sección `[storage]` de setlist.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
  pub backend: BackendKind,
  /// Archivo SQLite. Por defecto `<data_dir>/setlist.db`.
  pub db_path: Option<PathBuf>,
  /// Directorio del backend JSON. Por defecto `<data_dir>/store`.
  pub json_dir: Option<PathBuf>,
  pub journal_mode: Option<String>,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig { backend: BackendKind::Sqlite, db_path: None, json_dir: None, journal_mode: Some("WAL".to_string()) }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  /// Carga la sección y la vuelve a escribir, así el usuario ve todas las opciones.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    use setlist_config::ConfigBackend;

    let cfg: Self = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    use setlist_config::ConfigBackend;

    CONFIG_BACKEND.save_section(SECTION, self)
  }

  pub fn resolved_db_path(&self, paths: &SetlistPaths) -> PathBuf {
    self.db_path.clone().unwrap_or_else(|| paths.data_dir.join("setlist.db"))
  }

  pub fn resolved_json_dir(&self, paths: &SetlistPaths) -> PathBuf {
    self.json_dir.clone().unwrap_or_else(|| paths.data_dir.join("store"))
  }
}
