use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{SlotStorage, StorageError};

/// Slot storage backed by one JSON file per slot inside `base_dir`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn resolve_path(&self, slot: &str) -> Result<PathBuf, StorageError> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidSlot(slot.to_string()));
        }
        Ok(self.base_dir.join(format!("{slot}.json")))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[async_trait]
impl SlotStorage for LocalFileStorage {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve_path(slot)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, slot: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve_path(slot)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // tmp + rename so readers never observe a half-written slot
        let tmp_path = Self::temp_path(&path);
        fs::write(&tmp_path, data).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_slot_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());
        assert!(storage.read("mini_images").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_replaces_whole_slot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("nested"));
        storage.write("mini_settings", b"{\"a\":1,\"b\":2}").await.unwrap();
        storage.write("mini_settings", b"{}").await.unwrap();

        let bytes = storage.read("mini_settings").await.unwrap().unwrap();
        assert_eq!(bytes, b"{}");
        assert!(!dir.path().join("nested/mini_settings.json.tmp").exists());
    }

    #[test]
    fn slot_names_cannot_escape_base_dir() {
        let storage = LocalFileStorage::new(PathBuf::from("/data"));
        assert!(matches!(
            storage.resolve_path("../etc/passwd"),
            Err(StorageError::InvalidSlot(_))
        ));
        assert_eq!(
            storage.resolve_path("mini_images").unwrap(),
            PathBuf::from("/data/mini_images.json")
        );
    }
}
