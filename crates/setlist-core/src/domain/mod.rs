pub mod history_entry;
pub mod ids;
pub mod query;
pub mod song;

pub use history_entry::HistoryEntry;
pub use ids::SongId;
pub use query::{SongQuery, SortBy};
pub use song::Song;
