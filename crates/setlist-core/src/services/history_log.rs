use crate::domain::{HistoryEntry, Song};
use crate::errors::CoreError;

/// Setlists guardados, en orden de guardado (no de fecha).
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
  entries: Vec<HistoryEntry>,
}

impl HistoryLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
    Self { entries }
  }

  pub fn entries(&self) -> &[HistoryEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Copia los valores actuales de `songs` en una entrada nueva al final.
  pub fn save(&mut self, date: &str, songs: &[Song]) -> Result<HistoryEntry, CoreError> {
    if songs.is_empty() {
      return Err(CoreError::EmptySetlist);
    }
    let date = date.trim();
    if date.is_empty() {
      return Err(CoreError::Validation("date"));
    }

    let entry = HistoryEntry::new(date, songs);
    self.entries.push(entry.clone());
    Ok(entry)
  }

  /// Copia de las canciones de la entrada `index`.
  pub fn load(&self, index: usize) -> Result<Vec<Song>, CoreError> {
    self.entries.get(index).map(|e| e.songs.clone()).ok_or(CoreError::index(index, self.entries.len()))
  }

  pub fn delete(&mut self, index: usize) -> Result<HistoryEntry, CoreError> {
    if index >= self.entries.len() {
      return Err(CoreError::index(index, self.entries.len()));
    }
    Ok(self.entries.remove(index))
  }
}
