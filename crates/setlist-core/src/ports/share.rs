use crate::errors::CoreError;

// Efectos externos para compartir el setlist. El núcleo solo los pide;
// la capa de presentación decide cómo se cumplen.
pub trait ShareTarget {
  /// Copia el texto al portapapeles.
  fn copy_to_clipboard(&self, text: &str) -> Result<(), CoreError>;
  /// Abre un enlace (p. ej. el deep link de la app de mensajería).
  fn open_link(&self, url: &str) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChannel {
  Clipboard,
  Messaging,
}
