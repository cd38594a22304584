use crate::paths::{ConfigError, SetlistPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;

// toml_edit para escribir sin perder los comentarios del usuario
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: SetlistPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SetlistPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &SetlistPaths {
    &self.paths
  }

  /// Como `load_section`, pero archivo o sección ausentes dan `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let Some(content) = setlist_fs::read_optional(&path)? else {
      return Ok(T::default());
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // 1) Documento actual, o uno vacío si todavía no hay archivo.
    let mut doc: DocumentMut = match setlist_fs::read_optional(&path)? {
      Some(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      None => DocumentMut::new(),
    };

    // 2) La sección se serializa sola ("foo = 1\nbar = 2\n", sin cabecera)
    //    y se vuelve a parsear como tabla.
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 3) Reemplaza solo esa sección; el resto del documento queda intacto.
    doc[section] = section_item;

    setlist_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Sample {
    name: String,
    level: u32,
  }

  #[test]
  fn missing_file_and_section_fall_back_to_default() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(SetlistPaths::from_base(tmp.path()).unwrap());

    let s: Sample = backend.load_section_with_default("sample").unwrap();
    assert_eq!(s, Sample::default());
    assert!(backend.load_section::<Sample>("sample").is_err());
  }

  #[test]
  fn save_then_load_section() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(SetlistPaths::from_base(tmp.path()).unwrap());

    let value = Sample { name: "stage".into(), level: 3 };
    backend.save_section("sample", &value).unwrap();

    assert_eq!(backend.load_section::<Sample>("sample").unwrap(), value);
  }

  #[test]
  fn save_section_keeps_other_sections_and_comments() {
    let tmp = tempdir().unwrap();
    let paths = SetlistPaths::from_base(tmp.path()).unwrap();
    std::fs::write(paths.config_file(), "# my notes\n[other]\nkeep = true\n").unwrap();

    let backend = TomlConfigBackend::new(paths.clone());
    backend.save_section("sample", &Sample { name: "x".into(), level: 1 }).unwrap();

    let written = std::fs::read_to_string(paths.config_file()).unwrap();
    assert!(written.contains("# my notes"));
    assert!(written.contains("keep = true"));
    assert!(written.contains("[sample]"));
  }
}
