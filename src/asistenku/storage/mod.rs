// src/asistenku/storage/mod.rs
//
// Client-side key/value storage: the session-scoped and local stores that
// replace ambient browser storage.

pub mod keys;
pub mod memory;
pub mod storable;
pub mod store;

pub use memory::{Memory, StorageLayout};
pub use storable::Cbor;
pub use store::{BrowserStorage, KeyValueStore, MemoryStore, StableStore};
