use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::{fmt, str::FromStr};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::song::Song;

/// Campo por el que se ordena el listado del catálogo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
  /// Por título.
  #[default]
  Name,
  /// Por tonalidad.
  Key,
}

impl FromStr for SortBy {
  type Err = String;

  /// Acepta `name` o `key` (sin distinguir mayúsculas, con trimming).
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "name" | "nombre" => Ok(SortBy::Name),
      "key" | "tonalidad" => Ok(SortBy::Key),
      other => Err(format!("unknown sort field '{other}', expected 'name' or 'key'")),
    }
  }
}

impl fmt::Display for SortBy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      SortBy::Name => "name",
      SortBy::Key => "key",
    };
    f.write_str(s)
  }
}

/// Filtro + orden para listar el catálogo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
  /// Subcadena buscada en el nombre, sin distinguir mayúsculas. Vacía = todo.
  pub search: String,
  /// Tonalidad exacta. `None` = todas.
  pub key: Option<String>,
  pub sort_by: SortBy,
}

impl SongQuery {
  pub fn new(search: impl Into<String>) -> Self {
    SongQuery { search: search.into(), ..Default::default() }
  }

  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    let key = key.into();
    // Un selector vacío equivale a "todas las tonalidades".
    self.key = if key.is_empty() { None } else { Some(key) };
    self
  }

  pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
    self.sort_by = sort_by;
    self
  }

  pub fn matches(&self, song: &Song) -> bool {
    let needle = self.search.to_lowercase();
    if !song.name.to_lowercase().contains(&needle) {
      return false;
    }
    match &self.key {
      Some(key) => song.key == *key,
      None => true,
    }
  }

  pub fn compare(&self, a: &Song, b: &Song) -> Ordering {
    match self.sort_by {
      SortBy::Name => collate(&a.name, &b.name),
      SortBy::Key => collate(&a.key, &b.key),
    }
  }
}

/// Orden alfabético sin distinguir mayúsculas ni acentos ("Ángel" va junto a
/// "Amor", no después de "Zamba"). A igualdad decide el texto en minúsculas y
/// después el texto crudo.
pub fn collate(a: &str, b: &str) -> Ordering {
  fold(a)
    .cmp(&fold(b))
    .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    .then_with(|| a.cmp(b))
}

/// NFD y fuera las marcas combinantes: "Ñandú" -> "nandu".
fn fold(s: &str) -> String {
  s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sort_by_parses_known_fields() {
    assert_eq!("name".parse::<SortBy>().unwrap(), SortBy::Name);
    assert_eq!(" KEY ".parse::<SortBy>().unwrap(), SortBy::Key);
    assert!("tempo".parse::<SortBy>().is_err());
  }

  #[test]
  fn collate_ignores_case_and_accents() {
    assert_eq!(collate("Ángel", "Amor"), Ordering::Greater);
    assert_eq!(collate("Ángel", "Zamba"), Ordering::Less);
    assert_eq!(collate("éxodo", "Exodo"), Ordering::Greater);
    assert_eq!(collate("Exodo", "exodo"), Ordering::Less);
  }

  #[test]
  fn empty_key_filter_means_all() {
    let q = SongQuery::new("").with_key("");
    assert_eq!(q.key, None);
  }

  #[test]
  fn matches_substring_and_exact_key() {
    let song = Song::new("Amazing Grace", "G");
    assert!(SongQuery::new("grace").matches(&song));
    assert!(SongQuery::new("AMAZ").with_key("G").matches(&song));
    assert!(!SongQuery::new("").with_key("g").matches(&song));
    assert!(!SongQuery::new("hallelujah").matches(&song));
  }

  #[test]
  fn collation_ignores_case() {
    assert_eq!(collate("apple", "Banana"), Ordering::Less);
    assert_eq!(collate("Zebra", "apple"), Ordering::Greater);
    assert_eq!(collate("abc", "abc"), Ordering::Equal);
  }
}
