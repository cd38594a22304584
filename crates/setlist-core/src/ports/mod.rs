pub mod key_value;
pub mod share;

pub use key_value::{KeyValueStore, MemoryStore, StoreError};
pub use share::{ShareChannel, ShareTarget};
