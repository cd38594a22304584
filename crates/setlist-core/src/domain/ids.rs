use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identificador único de una canción del catálogo.
///
/// Se genera una sola vez al agregar la canción y nunca se reutiliza.
/// En el almacenamiento se serializa como el texto del UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
  /// Genera un nuevo identificador único.
  pub fn new() -> Self {
    SongId(Uuid::new_v4())
  }

  pub fn from_uuid(u: Uuid) -> Self {
    SongId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SongId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for SongId {
  fn from(u: Uuid) -> Self {
    SongId(u)
  }
}

impl From<SongId> for Uuid {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl FromStr for SongId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s.trim()).map(SongId)
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
