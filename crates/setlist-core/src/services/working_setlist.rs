use crate::domain::{Song, SongId};
use crate::errors::CoreError;
use crate::services::catalog::Catalog;

/// Setlist en armado para la próxima presentación.
///
/// Guarda referencias (ids) al catálogo, sin repetidos. Los datos de cada
/// canción se resuelven contra el catálogo al leer.
#[derive(Debug, Clone, Default)]
pub struct WorkingSetlist {
  ids: Vec<SongId>,
}

impl WorkingSetlist {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn ids(&self) -> &[SongId] {
    &self.ids
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  pub fn contains(&self, id: SongId) -> bool {
    self.ids.contains(&id)
  }

  /// Agrega al final. Devuelve `false` si ya estaba.
  pub fn append(&mut self, id: SongId, catalog: &Catalog) -> Result<bool, CoreError> {
    if !catalog.contains(id) {
      return Err(CoreError::NotFound(id));
    }
    if self.contains(id) {
      return Ok(false);
    }
    self.ids.push(id);
    Ok(true)
  }

  pub fn move_up(&mut self, index: usize) -> Result<(), CoreError> {
    self.check(index)?;
    if index > 0 {
      self.ids.swap(index - 1, index);
    }
    Ok(())
  }

  pub fn move_down(&mut self, index: usize) -> Result<(), CoreError> {
    self.check(index)?;
    if index + 1 < self.ids.len() {
      self.ids.swap(index, index + 1);
    }
    Ok(())
  }

  pub fn remove(&mut self, index: usize) -> Result<SongId, CoreError> {
    self.check(index)?;
    Ok(self.ids.remove(index))
  }

  /// Quita todas las referencias a `id` (cascada del borrado en el catálogo).
  pub fn remove_song(&mut self, id: SongId) -> bool {
    let before = self.ids.len();
    self.ids.retain(|i| *i != id);
    before != self.ids.len()
  }

  pub fn clear(&mut self) {
    self.ids.clear();
  }

  /// Reemplaza el contenido completo, descartando repetidos.
  pub fn replace(&mut self, ids: impl IntoIterator<Item = SongId>) {
    self.ids.clear();
    for id in ids {
      if !self.ids.contains(&id) {
        self.ids.push(id);
      }
    }
  }

  /// Canciones en el orden actual, con sus valores vigentes en el catálogo.
  pub fn resolve(&self, catalog: &Catalog) -> Vec<Song> {
    self.ids.iter().filter_map(|id| catalog.get(*id).cloned()).collect()
  }

  fn check(&self, index: usize) -> Result<(), CoreError> {
    if index < self.ids.len() { Ok(()) } else { Err(CoreError::index(index, self.ids.len())) }
  }
}
