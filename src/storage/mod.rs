pub mod hash;
pub mod local;
pub mod memory;

use async_trait::async_trait;

pub use hash::compute_hash;
pub use local::LocalFileStorage;
pub use memory::MemoryStorage;

/// Slot holding the serialized gallery sequence.
pub const GALLERY_SLOT: &str = "mini_images";
/// Slot holding the serialized settings object.
pub const SETTINGS_SLOT: &str = "mini_settings";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode slot payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid slot name: {0}")]
    InvalidSlot(String),
}

/// Named-slot durable storage.
///
/// `read` yields the last successfully written value, or `None` when the slot was
/// never written. `write` replaces the whole slot.
#[async_trait]
pub trait SlotStorage: Send + Sync {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn write(&self, slot: &str, data: &[u8]) -> Result<(), StorageError>;
}
