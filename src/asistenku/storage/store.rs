// src/asistenku/storage/store.rs
use crate::storage::memory::{Memory, StorageLayout};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// String key/value store with browser-storage semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
    fn keys(&self) -> Vec<String>;
}

/// Store backed by a `StableBTreeMap` living in one virtual memory.
pub struct StableStore {
    map: RefCell<StableBTreeMap<String, Cbor<String>, Memory>>,
}

impl StableStore {
    pub fn init(memory: Memory) -> Self {
        Self {
            map: RefCell::new(StableBTreeMap::init(memory)),
        }
    }
}

impl KeyValueStore for StableStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(&key.to_string()).map(|cbor| cbor.0)
    }

    fn set(&self, key: &str, value: &str) {
        self.map
            .borrow_mut()
            .insert(key.to_string(), Cbor(value.to_string()));
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(&key.to_string());
    }

    fn clear(&self) {
        let keys = self.keys();
        let mut map = self.map.borrow_mut();
        for key in keys {
            map.remove(&key);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.map.borrow().iter().map(|(key, _)| key).collect()
    }
}

/// Plain heap store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

/// The two scopes a page can write to: session-scoped and persistent.
#[derive(Clone)]
pub struct BrowserStorage {
    pub session: Rc<dyn KeyValueStore>,
    pub local: Rc<dyn KeyValueStore>,
}

impl BrowserStorage {
    pub fn stable(layout: &StorageLayout) -> Self {
        Self {
            session: Rc::new(StableStore::init(layout.session_memory())),
            local: Rc::new(StableStore::init(layout.local_memory())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            session: Rc::new(MemoryStore::new()),
            local: Rc::new(MemoryStore::new()),
        }
    }

    /// Ends the browsing session: session-scoped entries are dropped, local
    /// entries survive.
    pub fn end_session(&self) {
        self.session.clear();
    }
}
