use crate::domain::song::Song;
use serde::{Deserialize, Serialize};

/// Registro de un setlist ya usado.
///
/// `songs` guarda copias de las canciones tal como estaban al momento de
/// guardar: editar o borrar la canción en el catálogo no cambia la entrada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  /// Fecha del setlist, normalmente `YYYY-MM-DD`.
  pub date: String,
  pub songs: Vec<Song>,
}

impl HistoryEntry {
  pub fn new(date: impl Into<String>, songs: &[Song]) -> Self {
    HistoryEntry { date: date.into(), songs: songs.to_vec() }
  }

  /// Nombres separados por coma, para listados compactos.
  pub fn summary(&self) -> String {
    self.songs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
  }
}
