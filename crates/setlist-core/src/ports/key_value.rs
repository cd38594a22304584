use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("storage error: {0}")]
  Backend(String),
  #[error("stored value for '{key}' is not valid: {reason}")]
  Corrupt { key: String, reason: String },
}

/// Almacenamiento clave/valor de texto, al estilo de `localStorage`.
///
/// Las escrituras son síncronas: cuando `set` devuelve `Ok` el valor ya está
/// confirmado por el backend.
pub trait KeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    (**self).set(key, value)
  }
}

/// Backend en memoria. Útil para tests y sesiones descartables.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: RefCell<HashMap<String, String>>,
  fail_writes: Cell<bool>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Arranca con valores ya cargados, como si vinieran de una sesión anterior.
  pub fn with_entries<I, K, V>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    MemoryStore { entries: RefCell::new(map), fail_writes: Cell::new(false) }
  }

  /// Simula un backend lleno o caído: todas las escrituras fallan.
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.set(fail);
  }

  pub fn raw(&self, key: &str) -> Option<String> {
    self.entries.borrow().get(key).cloned()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    Ok(self.entries.borrow().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    if self.fail_writes.get() {
      return Err(StoreError::Backend("quota exceeded".into()));
    }
    self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}
