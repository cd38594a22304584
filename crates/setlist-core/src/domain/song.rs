use crate::domain::ids::SongId;
use serde::{Deserialize, Serialize};

/// Una canción del repertorio personal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  /// Identificador único de la canción dentro del catálogo.
  pub id: SongId,
  /// El título de la canción. Único dentro del catálogo sin distinguir mayúsculas.
  pub name: String,
  /// Tonalidad, texto libre ("G", "Am", "Bb").
  pub key: String,
  /// La letra. Vacía si todavía no se cargó.
  #[serde(default)]
  pub lyrics: String,
}

impl Song {
  pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
    Song { id: SongId::new(), name: name.into(), key: key.into(), lyrics: String::new() }
  }

  /// Compara nombres ignorando mayúsculas, como lo hace la regla de duplicados.
  pub fn has_name(&self, name: &str) -> bool {
    self.name.to_lowercase() == name.to_lowercase()
  }
}
