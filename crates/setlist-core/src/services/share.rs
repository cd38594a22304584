use crate::domain::Song;
use crate::errors::CoreError;

/// Deep link de la app de mensajería; el texto va percent-encoded al final.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://wa.me/?text=";

/// Texto que se muestra en modo escenario cuando la canción no tiene letra.
pub const NO_LYRICS_PLACEHOLDER: &str = "Sin letra";

/// `"<n>. <nombre> (<tonalidad>)"` por línea, numerando desde 1.
pub fn format_setlist(songs: &[Song]) -> Result<String, CoreError> {
  if songs.is_empty() {
    return Err(CoreError::EmptySetlist);
  }
  let lines: Vec<String> =
    songs.iter().enumerate().map(|(i, s)| format!("{}. {} ({})", i + 1, s.name, s.key)).collect();
  Ok(lines.join("\n"))
}

pub fn share_url(base: &str, text: &str) -> String {
  format!("{base}{}", urlencoding::encode(text))
}

pub fn lyrics_or_placeholder(song: &Song) -> &str {
  if song.lyrics.trim().is_empty() { NO_LYRICS_PLACEHOLDER } else { &song.lyrics }
}

/// Línea de la lista en modo escenario.
pub fn stage_line(song: &Song) -> String {
  format!("{} – {}", song.name, song.key)
}
