use setlist_config::SetlistPaths;
use setlist_core::CoreError;
use setlist_core::domain::SongQuery;
use setlist_core::services::SetlistService;
use setlist_storage::{BackendKind, StorageConfig, StoreBackend};
use tempfile::tempdir;

fn config(backend: BackendKind) -> StorageConfig {
  StorageConfig { backend, journal_mode: None, ..StorageConfig::default() }
}

fn session_survives_restart(backend: BackendKind) {
  let tmp = tempdir().unwrap();
  let paths = SetlistPaths::from_base(tmp.path()).unwrap();
  let cfg = config(backend);

  let (kept, dropped) = {
    let store = StoreBackend::open(&cfg, &paths).unwrap();
    let mut svc = SetlistService::open(store).unwrap();

    let a = svc.add_song("Amazing Grace", "G").unwrap();
    let b = svc.add_song("How Great Thou Art", "Bb").unwrap();
    svc.update_song(a.id, "Amazing Grace", "G", "Amazing grace, how sweet the sound").unwrap();

    svc.add_to_setlist(a.id).unwrap();
    svc.add_to_setlist(b.id).unwrap();
    svc.move_down(0).unwrap();
    svc.save_current_setlist("2024-12-24").unwrap();

    svc.delete_song(b.id).unwrap();
    (a, b)
  };

  let store = StoreBackend::open(&cfg, &paths).unwrap();
  let mut svc = SetlistService::open(store).unwrap();

  let songs = svc.list_songs(&SongQuery::new(""));
  assert_eq!(songs.len(), 1);
  assert_eq!(songs[0].id, kept.id);
  assert_eq!(songs[0].lyrics, "Amazing grace, how sweet the sound");

  let entry = &svc.history()[0];
  assert_eq!(entry.date, "2024-12-24");
  let names: Vec<&str> = entry.songs.iter().map(|s| s.name.as_str()).collect();
  assert_eq!(names, ["How Great Thou Art", "Amazing Grace"]);

  assert!(svc.setlist().is_empty());
  let loaded = svc.load_setlist_from_history(0).unwrap();
  assert_eq!(loaded.loaded, 1);
  assert_eq!(loaded.missing[0].id, dropped.id);

  assert!(matches!(svc.add_song("AMAZING GRACE", "A"), Err(CoreError::DuplicateName(_))));
}

#[test]
fn sqlite_session_survives_restart() {
  session_survives_restart(BackendKind::Sqlite);
}

#[test]
fn json_session_survives_restart() {
  session_survives_restart(BackendKind::Json);
}
