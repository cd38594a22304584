use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

/// Escribe `contents` en `path` de forma atómica: archivo temporal + rename.
///
/// Crea el directorio padre si falta. Un lector nunca ve un archivo a medio
/// escribir.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

/// Lee el archivo completo; `None` si no existe.
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn write_then_read_back() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("songs.json");

    atomic_write_str(&path, "[]").unwrap();
    atomic_write_str(&path, "[1]").unwrap();

    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[1]"));
    assert!(!path.with_extension("tmp").exists());
  }

  #[test]
  fn missing_file_reads_as_none() {
    let tmp = tempdir().unwrap();
    assert_eq!(read_optional(&tmp.path().join("nope.json")).unwrap(), None);
  }
}
