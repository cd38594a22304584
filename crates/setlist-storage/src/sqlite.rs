use std::cell::RefCell;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::debug;

use setlist_core::ports::{KeyValueStore, StoreError};

use crate::models::{KvRow, NewKvRow};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// `KeyValueStore` sobre una tabla SQLite (`kv_store`).
pub struct SqliteStore {
  conn: RefCell<SqliteConnection>,
}

impl SqliteStore {
  /// Abre (o crea) la base y aplica las migraciones pendientes.
  pub fn open(database_url: &str, journal_mode: Option<&str>) -> Result<Self, StoreError> {
    let mut conn = SqliteConnection::establish(database_url).map_err(backend_err)?;

    if let Some(mode) = journal_mode {
      let mode = mode.trim().to_uppercase();
      if !JOURNAL_MODES.contains(&mode.as_str()) {
        return Err(StoreError::Backend(format!("unsupported journal mode '{mode}'")));
      }
      conn.batch_execute(&format!("PRAGMA journal_mode = {mode};")).map_err(backend_err)?;
    }

    conn.run_pending_migrations(MIGRATIONS).map_err(|e| StoreError::Backend(e.to_string()))?;
    debug!(database_url, "sqlite store ready");

    Ok(Self { conn: RefCell::new(conn) })
  }

  /// Base en memoria, se pierde al cerrar.
  pub fn in_memory() -> Result<Self, StoreError> {
    Self::open(":memory:", None)
  }

  pub fn updated_at(&self, k: &str) -> Result<Option<String>, StoreError> {
    Ok(self.row(k)?.map(|row| row.updated_at))
  }

  fn row(&self, k: &str) -> Result<Option<KvRow>, StoreError> {
    use crate::schema::kv_store::dsl::*;

    let mut conn = self.conn.borrow_mut();

    kv_store
      .filter(key.eq(k))
      .select(KvRow::as_select())
      .first::<KvRow>(&mut *conn)
      .optional()
      .map_err(backend_err)
  }
}

impl KeyValueStore for SqliteStore {
  fn get(&self, k: &str) -> Result<Option<String>, StoreError> {
    Ok(self.row(k)?.map(|row| row.value))
  }

  fn set(&self, k: &str, v: &str) -> Result<(), StoreError> {
    use crate::schema::kv_store::dsl::*;

    let new_row = NewKvRow { key: k, value: v, updated_at: chrono::Utc::now().to_rfc3339() };
    let mut conn = self.conn.borrow_mut();

    diesel::insert_into(kv_store)
      .values(&new_row)
      .on_conflict(key)
      .do_update()
      .set((value.eq(v), updated_at.eq(&new_row.updated_at)))
      .execute(&mut *conn)
      .map_err(backend_err)?;

    Ok(())
  }
}

fn backend_err(e: impl std::fmt::Display) -> StoreError {
  StoreError::Backend(e.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn missing_key_is_none() {
    let store = SqliteStore::in_memory().unwrap();
    assert_eq!(store.get("songs").unwrap(), None);
  }

  #[test]
  fn set_upserts() {
    let store = SqliteStore::in_memory().unwrap();
    store.set("songs", "[]").unwrap();
    store.set("songs", "[1]").unwrap();

    assert_eq!(store.get("songs").unwrap().as_deref(), Some("[1]"));
    assert!(store.updated_at("songs").unwrap().is_some());
  }

  #[test]
  fn values_survive_reopen() {
    let tmp = tempdir().unwrap();
    let db = tmp.path().join("setlist.db");
    let url = db.to_str().unwrap();

    SqliteStore::open(url, Some("wal")).unwrap().set("history", "[]").unwrap();

    let reopened = SqliteStore::open(url, Some("WAL")).unwrap();
    assert_eq!(reopened.get("history").unwrap().as_deref(), Some("[]"));
  }

  #[test]
  fn rejects_unknown_journal_mode() {
    assert!(SqliteStore::open(":memory:", Some("wal; DROP TABLE kv_store")).is_err());
  }
}
