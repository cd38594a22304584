use crate::domain::{Song, SongId, SongQuery};
use crate::errors::CoreError;

/// El catálogo: dueño exclusivo de las canciones y de sus ids.
///
/// Mantiene el orden de inserción; los listados ordenados son copias.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  songs: Vec<Song>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_songs(songs: Vec<Song>) -> Self {
    Self { songs }
  }

  pub fn songs(&self) -> &[Song] {
    &self.songs
  }

  pub fn len(&self) -> usize {
    self.songs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.songs.is_empty()
  }

  pub fn get(&self, id: SongId) -> Option<&Song> {
    self.songs.iter().find(|s| s.id == id)
  }

  pub fn contains(&self, id: SongId) -> bool {
    self.get(id).is_some()
  }

  pub fn add(&mut self, name: &str, key: &str) -> Result<Song, CoreError> {
    let name = name.trim();
    let key = key.trim();
    require(name, "name")?;
    require(key, "key")?;

    if self.songs.iter().any(|s| s.has_name(name)) {
      return Err(CoreError::DuplicateName(name.to_owned()));
    }

    let song = Song::new(name, key);
    self.songs.push(song.clone());
    Ok(song)
  }

  /// Sobrescribe nombre, tonalidad y letra.
  ///
  /// No vuelve a validar que el nombre sea único.
  pub fn update(&mut self, id: SongId, name: &str, key: &str, lyrics: &str) -> Result<Song, CoreError> {
    let song = self.songs.iter_mut().find(|s| s.id == id).ok_or(CoreError::NotFound(id))?;
    let name = name.trim();
    let key = key.trim();
    require(name, "name")?;
    require(key, "key")?;

    song.name = name.to_owned();
    song.key = key.to_owned();
    song.lyrics = lyrics.to_owned();
    Ok(song.clone())
  }

  /// Quita la canción. Devuelve `None` si no existía.
  pub fn remove(&mut self, id: SongId) -> Option<Song> {
    let pos = self.songs.iter().position(|s| s.id == id)?;
    Some(self.songs.remove(pos))
  }

  pub fn list(&self, query: &SongQuery) -> Vec<Song> {
    let mut list: Vec<Song> = self.songs.iter().filter(|s| query.matches(s)).cloned().collect();
    // sort_by es estable: a igualdad se respeta el orden de inserción.
    list.sort_by(|a, b| query.compare(a, b));
    list
  }

  /// Tonalidades distintas presentes en el catálogo, ordenadas.
  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.songs.iter().map(|s| s.key.clone()).collect();
    keys.sort_by(|a, b| crate::domain::query::collate(a, b));
    keys.dedup();
    keys
  }
}

fn require(value: &str, field: &'static str) -> Result<(), CoreError> {
  if value.is_empty() { Err(CoreError::Validation(field)) } else { Ok(()) }
}
