pub mod catalog;
pub mod history_log;
pub mod persistent_store;
pub mod setlist_service;
pub mod share;
pub mod working_setlist;

pub use catalog::Catalog;
pub use history_log::HistoryLog;
pub use persistent_store::{HISTORY_KEY, PersistentStore, SONGS_KEY};
pub use setlist_service::{LoadedSetlist, SetlistService};
pub use working_setlist::WorkingSetlist;
