pub mod filter_store;
pub mod kv;

pub use filter_store::FilterStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
