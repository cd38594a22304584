mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ConfigError, SetlistPaths};

use once_cell::sync::Lazy;

// Singleton de paths (SETLIST_BASE_DIR o directorios del sistema)
pub static PATHS: Lazy<SetlistPaths> = Lazy::new(|| SetlistPaths::detect().expect("failed to init SetlistPaths"));

// Singleton del backend de config
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
