use tracing::{debug, info, warn};

use crate::domain::{HistoryEntry, Song, SongId, SongQuery};
use crate::errors::CoreError;
use crate::ports::{KeyValueStore, ShareChannel, ShareTarget, StoreError};
use crate::services::catalog::Catalog;
use crate::services::history_log::HistoryLog;
use crate::services::persistent_store::PersistentStore;
use crate::services::share::{self, DEFAULT_SHARE_BASE_URL};
use crate::services::working_setlist::WorkingSetlist;

/// Resultado de cargar un setlist del historial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSetlist {
  /// Canciones que quedaron en el setlist de trabajo.
  pub loaded: usize,
  /// Canciones de la entrada que ya no están en el catálogo.
  pub missing: Vec<Song>,
}

/// Controlador de la sesión: catálogo, setlist de trabajo e historial.
///
/// Toda mutación del catálogo o del historial se escribe en el store antes de
/// devolver. Si la escritura falla, el cambio queda en memoria y se devuelve
/// `CoreError::Persistence`.
pub struct SetlistService<S>
where
  S: KeyValueStore,
{
  store: PersistentStore<S>,
  catalog: Catalog,
  setlist: WorkingSetlist,
  history: HistoryLog,
  share_base_url: String,
}

impl<S> SetlistService<S>
where
  S: KeyValueStore,
{
  /// Carga `songs` e `history` una sola vez, al arrancar.
  pub fn open(backend: S) -> Result<Self, CoreError> {
    let store = PersistentStore::new(backend);
    let songs = store.load_songs().map_err(CoreError::Load)?;
    let history = store.load_history().map_err(CoreError::Load)?;

    info!(songs = songs.len(), history = history.len(), "setlist store opened");

    Ok(Self {
      store,
      catalog: Catalog::from_songs(songs),
      setlist: WorkingSetlist::new(),
      history: HistoryLog::from_entries(history),
      share_base_url: DEFAULT_SHARE_BASE_URL.to_owned(),
    })
  }

  pub fn with_share_base_url(mut self, base: impl Into<String>) -> Self {
    self.share_base_url = base.into();
    self
  }

  pub fn store(&self) -> &PersistentStore<S> {
    &self.store
  }

  // -------- CATALOG --------

  pub fn add_song(&mut self, name: &str, key: &str) -> Result<Song, CoreError> {
    let song = self.catalog.add(name, key)?;
    debug!(id = %song.id, name = %song.name, "song added");
    self.persist_songs()?;
    Ok(song)
  }

  pub fn update_song(&mut self, id: SongId, name: &str, key: &str, lyrics: &str) -> Result<Song, CoreError> {
    let song = self.catalog.update(id, name, key, lyrics)?;
    debug!(%id, name = %song.name, "song updated");
    self.persist_songs()?;
    Ok(song)
  }

  /// Borra la canción y sus apariciones en el setlist de trabajo.
  pub fn delete_song(&mut self, id: SongId) -> Result<(), CoreError> {
    let Some(song) = self.catalog.remove(id) else {
      return Ok(());
    };
    let in_setlist = self.setlist.remove_song(id);
    debug!(%id, name = %song.name, in_setlist, "song deleted");
    self.persist_songs()
  }

  pub fn song(&self, id: SongId) -> Option<&Song> {
    self.catalog.get(id)
  }

  pub fn list_songs(&self, query: &SongQuery) -> Vec<Song> {
    self.catalog.list(query)
  }

  pub fn keys(&self) -> Vec<String> {
    self.catalog.keys()
  }

  // -------- WORKING SETLIST --------

  pub fn add_to_setlist(&mut self, id: SongId) -> Result<(), CoreError> {
    if self.setlist.append(id, &self.catalog)? {
      debug!(%id, len = self.setlist.len(), "song appended to setlist");
    }
    Ok(())
  }

  pub fn move_up(&mut self, index: usize) -> Result<(), CoreError> {
    self.setlist.move_up(index)
  }

  pub fn move_down(&mut self, index: usize) -> Result<(), CoreError> {
    self.setlist.move_down(index)
  }

  pub fn remove_from_setlist(&mut self, index: usize) -> Result<(), CoreError> {
    self.setlist.remove(index).map(|_| ())
  }

  pub fn clear_setlist(&mut self) {
    self.setlist.clear();
  }

  pub fn setlist(&self) -> Vec<Song> {
    self.setlist.resolve(&self.catalog)
  }

  // -------- HISTORY --------

  pub fn history(&self) -> &[HistoryEntry] {
    self.history.entries()
  }

  /// Pasa el setlist de trabajo al historial y lo vacía.
  pub fn save_current_setlist(&mut self, date: &str) -> Result<HistoryEntry, CoreError> {
    let songs = self.setlist();
    let entry = self.history.save(date, &songs)?;
    self.setlist.clear();
    info!(date = %entry.date, songs = entry.songs.len(), "setlist saved to history");
    self.persist_history()?;
    Ok(entry)
  }

  /// Reemplaza el setlist de trabajo con la entrada `index` del historial.
  ///
  /// Las canciones que ya no existen en el catálogo se omiten.
  pub fn load_setlist_from_history(&mut self, index: usize) -> Result<LoadedSetlist, CoreError> {
    let songs = self.history.load(index)?;
    let (present, missing): (Vec<Song>, Vec<Song>) = songs.into_iter().partition(|s| self.catalog.contains(s.id));

    if !missing.is_empty() {
      warn!(index, missing = missing.len(), "history entry references deleted songs");
    }

    self.setlist.replace(present.iter().map(|s| s.id));
    Ok(LoadedSetlist { loaded: self.setlist.len(), missing })
  }

  pub fn delete_history_entry(&mut self, index: usize) -> Result<(), CoreError> {
    let entry = self.history.delete(index)?;
    debug!(index, date = %entry.date, "history entry deleted");
    self.persist_history()
  }

  // -------- SHARING / STAGE --------

  pub fn format_for_sharing(&self) -> Result<String, CoreError> {
    share::format_setlist(&self.setlist())
  }

  pub fn share_link(&self) -> Result<String, CoreError> {
    Ok(share::share_url(&self.share_base_url, &self.format_for_sharing()?))
  }

  pub fn share<T: ShareTarget>(&self, target: &T, channel: ShareChannel) -> Result<(), CoreError> {
    match channel {
      ShareChannel::Clipboard => target.copy_to_clipboard(&self.format_for_sharing()?),
      ShareChannel::Messaging => target.open_link(&self.share_link()?),
    }
  }

  /// Canciones para el modo escenario. Falla si no hay nada armado.
  pub fn stage_songs(&self) -> Result<Vec<Song>, CoreError> {
    let songs = self.setlist();
    if songs.is_empty() { Err(CoreError::EmptySetlist) } else { Ok(songs) }
  }

  fn persist_songs(&self) -> Result<(), CoreError> {
    self.store.save_songs(self.catalog.songs()).map_err(persistence_failed)
  }

  fn persist_history(&self) -> Result<(), CoreError> {
    self.store.save_history(self.history.entries()).map_err(persistence_failed)
  }
}

fn persistence_failed(err: StoreError) -> CoreError {
  warn!(error = %err, "write-through failed, change kept in memory only");
  CoreError::Persistence(err)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::MemoryStore;
  use crate::services::persistent_store::{HISTORY_KEY, SONGS_KEY};
  use std::cell::RefCell;

  fn service() -> SetlistService<MemoryStore> {
    SetlistService::open(MemoryStore::new()).unwrap()
  }

  fn with_songs(names: &[(&str, &str)]) -> (SetlistService<MemoryStore>, Vec<SongId>) {
    let mut svc = service();
    let ids = names.iter().map(|(n, k)| svc.add_song(n, k).unwrap().id).collect();
    (svc, ids)
  }

  #[derive(Default)]
  struct RecordingTarget {
    clipboard: RefCell<Vec<String>>,
    links: RefCell<Vec<String>>,
  }

  impl ShareTarget for RecordingTarget {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), CoreError> {
      self.clipboard.borrow_mut().push(text.to_owned());
      Ok(())
    }

    fn open_link(&self, url: &str) -> Result<(), CoreError> {
      self.links.borrow_mut().push(url.to_owned());
      Ok(())
    }
  }

  #[test]
  fn added_song_is_listed_once_and_persisted() {
    let mut svc = service();
    let song = svc.add_song("Amazing Grace", "G").unwrap();

    let listed = svc.list_songs(&SongQuery::new(""));
    assert_eq!(listed, vec![song.clone()]);

    let raw = svc.store().backend().raw(SONGS_KEY).unwrap();
    assert!(raw.contains("Amazing Grace"));
  }

  #[test]
  fn duplicate_name_keeps_single_song() {
    let mut svc = service();
    svc.add_song("Amazing Grace", "G").unwrap();
    assert!(matches!(svc.add_song("amazing grace", "A"), Err(CoreError::DuplicateName(_))));
    assert_eq!(svc.list_songs(&SongQuery::new("")).len(), 1);
  }

  #[test]
  fn update_round_trips_through_lookup() {
    let (mut svc, ids) = with_songs(&[("Song A", "C")]);
    svc.update_song(ids[0], "Song Z", "Eb", "first line\nsecond line").unwrap();

    let song = svc.song(ids[0]).unwrap();
    assert_eq!(
      (song.name.as_str(), song.key.as_str(), song.lyrics.as_str()),
      ("Song Z", "Eb", "first line\nsecond line")
    );
  }

  #[test]
  fn deleting_a_song_cascades_to_the_setlist() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D")]);
    svc.add_to_setlist(ids[0]).unwrap();
    svc.add_to_setlist(ids[1]).unwrap();

    svc.delete_song(ids[0]).unwrap();

    assert!(svc.song(ids[0]).is_none());
    let names: Vec<String> = svc.setlist().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["Song B"]);
    assert_eq!(svc.move_up(1).unwrap_err().to_string(), "position 1 is out of range (length 1)");
  }

  #[test]
  fn deleting_unknown_song_is_a_no_op() {
    let (mut svc, _) = with_songs(&[("Song A", "C")]);
    svc.delete_song(SongId::new()).unwrap();
    assert_eq!(svc.list_songs(&SongQuery::new("")).len(), 1);
  }

  #[test]
  fn saved_history_is_a_snapshot() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D"), ("Song C", "E")]);
    for id in &ids {
      svc.add_to_setlist(*id).unwrap();
    }

    let entry = svc.save_current_setlist("2024-05-01").unwrap();
    assert_eq!(entry.songs.len(), 3);
    assert!(svc.setlist().is_empty());

    svc.update_song(ids[1], "Renamed", "F", "").unwrap();
    svc.delete_song(ids[2]).unwrap();

    let saved = &svc.history()[0];
    let names: Vec<&str> = saved.songs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Song A", "Song B", "Song C"]);
    assert_eq!(saved.songs[1].key, "D");
  }

  #[test]
  fn saving_empty_setlist_changes_nothing() {
    let mut svc = service();
    assert!(matches!(svc.save_current_setlist("2024-05-01"), Err(CoreError::EmptySetlist)));
    assert!(svc.history().is_empty());
    assert!(svc.store().backend().raw(HISTORY_KEY).is_none());
  }

  #[test]
  fn loading_history_replaces_setlist_and_skips_deleted_songs() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D"), ("Song C", "E")]);
    svc.add_to_setlist(ids[2]).unwrap();
    svc.add_to_setlist(ids[0]).unwrap();
    svc.save_current_setlist("2024-05-01").unwrap();

    svc.add_to_setlist(ids[1]).unwrap();
    svc.delete_song(ids[0]).unwrap();

    let loaded = svc.load_setlist_from_history(0).unwrap();
    assert_eq!(loaded.loaded, 1);
    assert_eq!(loaded.missing.len(), 1);
    assert_eq!(loaded.missing[0].name, "Song A");

    let names: Vec<String> = svc.setlist().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["Song C"]);
    assert_eq!(svc.history()[0].songs.len(), 2);
  }

  #[test]
  fn load_and_delete_history_check_bounds() {
    let mut svc = service();
    assert!(matches!(svc.load_setlist_from_history(0), Err(CoreError::Index { .. })));
    assert!(matches!(svc.delete_history_entry(0), Err(CoreError::Index { .. })));
  }

  #[test]
  fn state_survives_reopening_the_store() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D")]);
    svc.add_to_setlist(ids[1]).unwrap();
    svc.save_current_setlist("2024-05-01").unwrap();

    let backend = MemoryStore::with_entries([
      (SONGS_KEY, svc.store().backend().raw(SONGS_KEY).unwrap()),
      (HISTORY_KEY, svc.store().backend().raw(HISTORY_KEY).unwrap()),
    ]);
    let reopened = SetlistService::open(backend).unwrap();

    assert_eq!(reopened.list_songs(&SongQuery::new("")).len(), 2);
    assert_eq!(reopened.history().len(), 1);
    assert_eq!(reopened.history()[0].songs[0].id, ids[1]);
    assert!(reopened.setlist().is_empty());
  }

  #[test]
  fn failed_write_keeps_memory_state_and_reports_persistence() {
    let mut svc = service();
    svc.store().backend().fail_writes(true);

    let err = svc.add_song("Song A", "C").unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
    assert_eq!(svc.list_songs(&SongQuery::new("")).len(), 1);
    assert!(svc.store().backend().raw(SONGS_KEY).is_none());
  }

  #[test]
  fn failed_history_write_keeps_entry_and_clears_setlist() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D")]);
    svc.add_to_setlist(ids[0]).unwrap();
    svc.add_to_setlist(ids[1]).unwrap();
    svc.store().backend().fail_writes(true);

    let err = svc.save_current_setlist("2024-06-01").unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
    assert_eq!(svc.history().len(), 1);
    assert_eq!(svc.history()[0].songs.len(), 2);
    assert!(svc.setlist().is_empty());
    assert!(svc.store().backend().raw(HISTORY_KEY).is_none());
  }

  #[test]
  fn corrupt_store_fails_to_open() {
    let backend = MemoryStore::with_entries([(SONGS_KEY, "[{]")]);
    assert!(matches!(SetlistService::open(backend), Err(CoreError::Load(_))));
  }

  #[test]
  fn sharing_hands_text_and_link_to_target() {
    let (mut svc, ids) = with_songs(&[("Song A", "C"), ("Song B", "D")]);
    let target = RecordingTarget::default();

    assert!(matches!(svc.share(&target, ShareChannel::Clipboard), Err(CoreError::EmptySetlist)));

    svc.add_to_setlist(ids[0]).unwrap();
    svc.add_to_setlist(ids[1]).unwrap();
    assert_eq!(svc.format_for_sharing().unwrap(), "1. Song A (C)\n2. Song B (D)");

    svc.share(&target, ShareChannel::Clipboard).unwrap();
    svc.share(&target, ShareChannel::Messaging).unwrap();

    assert_eq!(*target.clipboard.borrow(), vec!["1. Song A (C)\n2. Song B (D)".to_string()]);
    assert!(target.links.borrow()[0].starts_with("https://wa.me/?text=1.%20Song%20A"));
  }

  #[test]
  fn stage_requires_a_setlist() {
    let (mut svc, ids) = with_songs(&[("Song A", "C")]);
    assert!(matches!(svc.stage_songs(), Err(CoreError::EmptySetlist)));
    svc.add_to_setlist(ids[0]).unwrap();
    assert_eq!(svc.stage_songs().unwrap().len(), 1);
  }
}
