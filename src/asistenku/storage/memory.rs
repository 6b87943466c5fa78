// src/asistenku/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;

const SESSION_STORE_MEM_ID: MemoryId = MemoryId::new(0);
const LOCAL_STORE_MEM_ID: MemoryId = MemoryId::new(1);

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

/// Owns the memory manager and hands out one virtual memory per store.
///
/// Natively every layout gets its own heap-backed memory. Inside a canister
/// `DefaultMemoryImpl` is the single stable memory, so only one layout should
/// exist per canister.
pub struct StorageLayout {
    manager: MemoryManager<DefaultMemoryImpl>,
}

impl StorageLayout {
    pub fn new() -> Self {
        Self::init(DefaultMemoryImpl::default())
    }

    pub fn init(memory: DefaultMemoryImpl) -> Self {
        Self {
            manager: MemoryManager::init(memory),
        }
    }

    pub fn get_memory(&self, id: MemoryId) -> Memory {
        self.manager.get(id)
    }

    pub fn session_memory(&self) -> Memory {
        self.get_memory(SESSION_STORE_MEM_ID)
    }

    pub fn local_memory(&self) -> Memory {
        self.get_memory(LOCAL_STORE_MEM_ID)
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new()
    }
}
