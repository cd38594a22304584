use std::path::{Path, PathBuf};

use setlist_core::ports::{KeyValueStore, StoreError};

/// Un archivo `<clave>.json` por clave dentro de `dir`.
///
/// Cada `set` reescribe el archivo completo de forma atómica.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
  dir: PathBuf,
}

impl JsonDirStore {
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(format!("create {dir:?}: {e}")))?;
    Ok(Self { dir })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
    let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
      return Err(StoreError::Backend(format!("invalid key '{key}'")));
    }
    Ok(self.dir.join(format!("{key}.json")))
  }
}

impl KeyValueStore for JsonDirStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let path = self.path_for(key)?;
    setlist_fs::read_optional(&path).map_err(|e| StoreError::Backend(format!("read {path:?}: {e}")))
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    let path = self.path_for(key)?;
    setlist_fs::atomic_write_str(&path, value).map_err(|e| StoreError::Backend(format!("write {path:?}: {e}")))
  }
}
