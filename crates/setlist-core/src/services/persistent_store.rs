use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{HistoryEntry, Song};
use crate::ports::{KeyValueStore, StoreError};

pub const SONGS_KEY: &str = "songs";
pub const HISTORY_KEY: &str = "history";

/// Persiste las dos colecciones (`songs`, `history`) como arrays JSON.
///
/// Cada guardado reescribe la colección completa; no hay escrituras parciales.
pub struct PersistentStore<S: KeyValueStore> {
  backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
  pub fn new(backend: S) -> Self {
    Self { backend }
  }

  pub fn backend(&self) -> &S {
    &self.backend
  }

  pub fn into_backend(self) -> S {
    self.backend
  }

  pub fn load_songs(&self) -> Result<Vec<Song>, StoreError> {
    self.load(SONGS_KEY)
  }

  pub fn load_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
    self.load(HISTORY_KEY)
  }

  pub fn save_songs(&self, songs: &[Song]) -> Result<(), StoreError> {
    self.save(SONGS_KEY, songs)
  }

  pub fn save_history(&self, history: &[HistoryEntry]) -> Result<(), StoreError> {
    self.save(HISTORY_KEY, history)
  }

  fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
    let Some(raw) = self.backend.get(key)? else {
      return Ok(Vec::new());
    };

    // `null` guardado cuenta igual que una clave ausente.
    let items: Option<Vec<T>> = serde_json::from_str(&raw)
      .map_err(|e| StoreError::Corrupt { key: key.to_owned(), reason: e.to_string() })?;

    Ok(items.unwrap_or_default())
  }

  fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
    let raw = serde_json::to_string(items)
      .map_err(|e| StoreError::Backend(format!("encode '{key}': {e}")))?;
    self.backend.set(key, &raw)
  }
}
