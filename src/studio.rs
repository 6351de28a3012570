use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::controller::{CompletionHandler, GenerationCompleted, GenerationController, GenerationError};
use crate::gallery::{GalleryStore, SavedImage};
use crate::generator::ImageGenerator;
use crate::settings::{AppSettings, Language, SettingsStore};
use crate::storage::{SlotStorage, StorageError};
use crate::story::StoryScene;
use crate::types::{GenerationRequest, ImageKind};

/// Generic, user-facing failure text for a mode.
pub fn failure_notice(kind: ImageKind, language: Language) -> &'static str {
    match (kind, language) {
        (ImageKind::Create, Language::Ar) => "حدث خطأ أثناء إنشاء الصورة. يرجى المحاولة مرة أخرى.",
        (ImageKind::Story, Language::Ar) => "حدث خطأ أثناء إنشاء المشهد. يرجى التأكد من وصف المشهد.",
        (ImageKind::Create, Language::En) => {
            "An error occurred while creating the image. Please try again."
        }
        (ImageKind::Story, Language::En) => {
            "An error occurred while creating the scene. Please check the scene description."
        }
    }
}

/// Where a successful image ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// Auto-save was off when the image arrived.
    Skipped,
    /// Auto-save was on but the gallery write failed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub image_url: String,
    pub save: SaveStatus,
}

/// Application state: both stores plus one controller per authoring mode.
pub struct Studio {
    gallery: GalleryStore,
    settings: SettingsStore,
    create: GenerationController,
    story: GenerationController,
    notices: Mutex<HashMap<ImageKind, String>>,
}

impl Studio {
    /// Loads both stores once and builds independent Create/Story controllers.
    pub async fn open(storage: Arc<dyn SlotStorage>, generator: Arc<dyn ImageGenerator>) -> Self {
        let gallery = GalleryStore::open(storage.clone()).await;
        let settings = SettingsStore::open(storage).await;
        info!(images = gallery.len().await, "studio loaded");
        Self {
            gallery,
            settings,
            create: GenerationController::new(ImageKind::Create, generator.clone()),
            story: GenerationController::new(ImageKind::Story, generator),
            notices: Mutex::new(HashMap::new()),
        }
    }

    pub fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    pub fn controller(&self, kind: ImageKind) -> &GenerationController {
        match kind {
            ImageKind::Create => &self.create,
            ImageKind::Story => &self.story,
        }
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<Generated, GenerationError> {
        let auto_save = AutoSave::new(self);
        let result = self.create.submit(request, &auto_save).await;
        self.settle(ImageKind::Create, result, auto_save).await
    }

    pub async fn generate_scene(&self, scene: &StoryScene) -> Result<Generated, GenerationError> {
        let auto_save = AutoSave::new(self);
        let result = self.story.submit_scene(scene, &auto_save).await;
        self.settle(ImageKind::Story, result, auto_save).await
    }

    /// Notice recorded for the most recent failed generation of `kind`, if any.
    pub fn last_notice(&self, kind: ImageKind) -> Option<String> {
        self.lock_notices().get(&kind).cloned()
    }

    pub fn take_notice(&self, kind: ImageKind) -> Option<String> {
        self.lock_notices().remove(&kind)
    }

    pub async fn images(&self) -> Vec<SavedImage> {
        self.gallery.images().await
    }

    pub async fn delete_image(&self, id: &str) -> Result<bool, StorageError> {
        self.gallery.remove(id).await
    }

    /// Empties the gallery. Callers confirm with the user first.
    pub async fn clear_history(&self) -> Result<(), StorageError> {
        self.gallery.clear().await
    }

    pub async fn settings(&self) -> AppSettings {
        self.settings.get().await
    }

    pub async fn update_settings<F>(&self, mutator: F) -> Result<AppSettings, StorageError>
    where
        F: FnOnce(&mut AppSettings),
    {
        self.settings.update(mutator).await
    }

    pub async fn toggle_theme(&self) -> Result<AppSettings, StorageError> {
        self.settings.toggle_theme().await
    }

    async fn settle(
        &self,
        kind: ImageKind,
        result: Result<String, GenerationError>,
        auto_save: AutoSave<'_>,
    ) -> Result<Generated, GenerationError> {
        match result {
            Ok(image_url) => Ok(Generated {
                image_url,
                save: auto_save.status(),
            }),
            Err(err) => {
                if matches!(err, GenerationError::RemoteGenerationFailure(_)) {
                    let language = self.settings.get().await.language;
                    self.lock_notices()
                        .insert(kind, failure_notice(kind, language).to_string());
                }
                Err(err)
            }
        }
    }

    fn lock_notices(&self) -> MutexGuard<'_, HashMap<ImageKind, String>> {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Completion handler for one submission: saves the image when auto-save is on and
/// remembers how that went.
struct AutoSave<'a> {
    studio: &'a Studio,
    status: Mutex<SaveStatus>,
}

impl<'a> AutoSave<'a> {
    fn new(studio: &'a Studio) -> Self {
        Self {
            studio,
            status: Mutex::new(SaveStatus::Skipped),
        }
    }

    fn status(&self) -> SaveStatus {
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<'a> CompletionHandler for AutoSave<'a> {
    async fn on_generated(&self, event: GenerationCompleted) {
        if !self.studio.settings.get().await.auto_save {
            return;
        }
        let status = match self.studio.gallery.append(SavedImage::from_completion(&event)).await {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(error = %err, kind = %event.kind, "generated image was not saved");
                SaveStatus::Failed
            }
        };
        *self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }
}
