//! Word collection, stats and settings mirrored to key-value storage.

pub mod storage;
pub mod words;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use words::{WordStore, SETTINGS_KEY, STATS_KEY, WORDS_KEY};
