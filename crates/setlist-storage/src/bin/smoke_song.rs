use setlist_core::domain::SongQuery;
use setlist_core::services::SetlistService;
use setlist_storage::SqliteStore;

fn main() {
  // Base local, junto al directorio de trabajo
  let store = SqliteStore::open("setlist-smoke.db", Some("WAL")).expect("failed to connect");
  let mut service = SetlistService::open(store).expect("failed to load store");

  let song = match service.add_song("Test Song", "G") {
    Ok(song) => song,
    Err(e) => {
      println!("add skipped: {e}");
      service.list_songs(&SongQuery::new("Test Song")).remove(0)
    }
  };

  println!("Song id = {}", song.id);

  service.add_to_setlist(song.id).expect("failed to append");
  let entry = service.save_current_setlist("2025-01-01").expect("failed to save setlist");

  println!("Saved history entry: {entry:?}");
  println!("History size: {}", service.history().len());
}
