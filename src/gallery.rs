//! Saved images and the write-through gallery store.
//!
//! The gallery is an ordered, newest-first list persisted as one JSON array in the
//! [`GALLERY_SLOT`]. Every mutation encodes and writes the full sequence before the
//! in-memory copy is replaced, so memory and storage never diverge.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::controller::GenerationCompleted;
use crate::storage::{GALLERY_SLOT, SlotStorage, StorageError};
use crate::types::{AspectRatio, ImageKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    /// Creation time in epoch milliseconds, as a decimal string. Two saves within the
    /// same millisecond collide; callers accept that.
    pub id: String,
    /// Image reference, usually an inline `data:` URL.
    pub url: String,
    pub prompt: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: ImageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

impl SavedImage {
    pub fn new(
        url: impl Into<String>,
        prompt: impl Into<String>,
        kind: ImageKind,
        aspect_ratio: Option<AspectRatio>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let timestamp = created_at.timestamp_millis();
        Self {
            id: timestamp.to_string(),
            url: url.into(),
            prompt: prompt.into(),
            timestamp,
            kind,
            aspect_ratio,
        }
    }

    pub fn from_completion(event: &GenerationCompleted) -> Self {
        Self::new(
            event.image_url.clone(),
            event.prompt.clone(),
            event.kind,
            Some(event.aspect_ratio),
            Utc::now(),
        )
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

pub struct GalleryStore {
    storage: Arc<dyn SlotStorage>,
    images: Mutex<Vec<SavedImage>>,
}

impl GalleryStore {
    /// Builds the store and performs the startup load.
    pub async fn open(storage: Arc<dyn SlotStorage>) -> Self {
        let images = read_persisted(storage.as_ref()).await;
        Self {
            storage,
            images: Mutex::new(images),
        }
    }

    /// Re-reads the persisted sequence and makes it the current state.
    ///
    /// Absent or undecodable data yields an empty gallery; this never fails.
    pub async fn load(&self) -> Vec<SavedImage> {
        let mut images = self.images.lock().await;
        *images = read_persisted(self.storage.as_ref()).await;
        images.clone()
    }

    /// Inserts `image` at the head. Duplicates are kept.
    pub async fn append(&self, image: SavedImage) -> Result<(), StorageError> {
        let mut images = self.images.lock().await;
        let mut next = Vec::with_capacity(images.len() + 1);
        next.push(image);
        next.extend(images.iter().cloned());
        self.persist(&next).await?;
        *images = next;
        Ok(())
    }

    /// Removes the record with `id`. Returns `false` when nothing matched.
    pub async fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let mut images = self.images.lock().await;
        if !images.iter().any(|image| image.id == id) {
            return Ok(false);
        }
        let next: Vec<SavedImage> = images.iter().filter(|image| image.id != id).cloned().collect();
        self.persist(&next).await?;
        *images = next;
        Ok(true)
    }

    /// Drops every record unconditionally. Confirmation is the caller's job.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut images = self.images.lock().await;
        self.persist(&[]).await?;
        images.clear();
        Ok(())
    }

    pub async fn images(&self) -> Vec<SavedImage> {
        self.images.lock().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<SavedImage> {
        self.images
            .lock()
            .await
            .iter()
            .find(|image| image.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.images.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.lock().await.is_empty()
    }

    async fn persist(&self, images: &[SavedImage]) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(images)?;
        if let Err(err) = self.storage.write(GALLERY_SLOT, &payload).await {
            warn!(error = %err, "failed to persist gallery");
            return Err(err);
        }
        debug!(count = images.len(), "gallery persisted");
        Ok(())
    }
}

async fn read_persisted(storage: &dyn SlotStorage) -> Vec<SavedImage> {
    let bytes = match storage.read(GALLERY_SLOT).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("no persisted gallery, starting empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(error = %err, "failed to read gallery, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice::<Vec<SavedImage>>(&bytes) {
        Ok(images) => images,
        Err(err) => {
            warn!(error = %err, "persisted gallery is corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn image(id_ms: i64, prompt: &str) -> SavedImage {
        SavedImage::new(
            "data:image/png;base64,AAAA",
            prompt,
            ImageKind::Create,
            Some(AspectRatio::Square),
            Utc.timestamp_millis_opt(id_ms).unwrap(),
        )
    }

    async fn store_over(storage: Arc<MemoryStorage>) -> GalleryStore {
        GalleryStore::open(storage).await
    }

    #[tokio::test]
    async fn append_puts_newest_first_and_survives_reload() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_over(storage.clone()).await;
        store.append(image(1, "first")).await.unwrap();
        store.append(image(2, "second")).await.unwrap();

        let reloaded = store_over(storage).await.load().await;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].prompt, "second");
        assert_eq!(reloaded[1].prompt, "first");
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let store = store_over(Arc::new(MemoryStorage::new())).await;
        store.append(image(5, "same")).await.unwrap();
        store.append(image(5, "same")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn remove_unknown_id_reports_not_found() {
        let store = store_over(Arc::new(MemoryStorage::new())).await;
        store.append(image(1, "keep")).await.unwrap();

        assert!(!store.remove("404").await.unwrap());
        assert_eq!(store.images().await, vec![image(1, "keep")]);
    }

    #[tokio::test]
    async fn remove_persists_the_shorter_sequence() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_over(storage.clone()).await;
        store.append(image(1, "a")).await.unwrap();
        store.append(image(2, "b")).await.unwrap();

        assert!(store.remove("1").await.unwrap());
        let reloaded = store_over(storage).await.load().await;
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, "2");
    }

    #[tokio::test]
    async fn clear_then_load_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_over(storage.clone()).await;
        store.append(image(1, "a")).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.is_empty());
        assert_eq!(storage.read(GALLERY_SLOT).await.unwrap().unwrap(), b"[]");
    }

    #[tokio::test]
    async fn corrupt_slot_falls_back_to_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(GALLERY_SLOT, b"{not json").await.unwrap();
        let store = store_over(storage).await;
        assert!(store.is_empty().await);
        assert!(store.load().await.is_empty());
    }

    #[test]
    fn saved_image_uses_camel_case_shape() {
        let value = serde_json::to_value(image(1_700_000_000_000, "غابة")).unwrap();
        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["type"], "create");
        assert_eq!(value["aspectRatio"], "1:1");
        assert_eq!(value["timestamp"], 1_700_000_000_000i64);

        let without_ratio: SavedImage = serde_json::from_str(
            r#"{"id":"1","url":"u","prompt":"p","timestamp":1,"type":"story"}"#,
        )
        .unwrap();
        assert_eq!(without_ratio.kind, ImageKind::Story);
        assert_eq!(without_ratio.aspect_ratio, None);
    }
}
