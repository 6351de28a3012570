use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{SlotStorage, StorageError};

/// In-process slot storage. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SlotStorage for MemoryStorage {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slots().get(slot).cloned())
    }

    async fn write(&self, slot: &str, data: &[u8]) -> Result<(), StorageError> {
        self.slots().insert(slot.to_string(), data.to_vec());
        Ok(())
    }
}
