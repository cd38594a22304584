// crates/setlist-core/src/errors.rs
use thiserror::Error;

use crate::domain::SongId;
use crate::ports::StoreError;

/// Error genérico del núcleo.
///
/// Todos son recuperables: la capa de presentación los muestra como un
/// mensaje corto y sigue. Salvo `Persistence`, ninguno deja cambios a medias.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Campo obligatorio vacío.
  #[error("{0} is required")]
  Validation(&'static str),

  #[error("a song named '{0}' already exists")]
  DuplicateName(String),

  #[error("song {0} not found")]
  NotFound(SongId),

  #[error("position {index} is out of range (length {len})")]
  Index { index: usize, len: usize },

  #[error("the setlist is empty")]
  EmptySetlist,

  /// El cambio quedó aplicado en memoria pero no se pudo escribir.
  #[error("change applied but not saved, it may be lost on restart: {0}")]
  Persistence(#[source] StoreError),

  #[error("could not load stored data: {0}")]
  Load(#[source] StoreError),

  /// El portapapeles o el enlace externo no respondieron.
  #[error("share failed: {0}")]
  Share(String),
}

impl CoreError {
  pub(crate) fn index(index: usize, len: usize) -> Self {
    CoreError::Index { index, len }
  }
}
