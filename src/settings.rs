use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::storage::{SETTINGS_SLOT, SlotStorage, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// User display preferences. Fields missing from a persisted object take their
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub language: Language,
    /// Whether successful generations are captured into the gallery.
    pub auto_save: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: Language::Ar,
            auto_save: true,
        }
    }
}

/// Holds the single current [`AppSettings`] and writes it through on every change.
pub struct SettingsStore {
    storage: Arc<dyn SlotStorage>,
    current: Mutex<AppSettings>,
}

impl SettingsStore {
    pub async fn open(storage: Arc<dyn SlotStorage>) -> Self {
        let current = read_persisted(storage.as_ref()).await;
        Self {
            storage,
            current: Mutex::new(current),
        }
    }

    pub async fn load(&self) -> AppSettings {
        let mut current = self.current.lock().await;
        *current = read_persisted(self.storage.as_ref()).await;
        current.clone()
    }

    pub async fn get(&self) -> AppSettings {
        self.current.lock().await.clone()
    }

    /// Applies `mutator` to a copy of the current value, persists the whole result,
    /// then commits it. On a storage error the previous value stays current.
    pub async fn update<F>(&self, mutator: F) -> Result<AppSettings, StorageError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut current = self.current.lock().await;
        let mut next = current.clone();
        mutator(&mut next);
        let payload = serde_json::to_vec(&next)?;
        if let Err(err) = self.storage.write(SETTINGS_SLOT, &payload).await {
            warn!(error = %err, "failed to persist settings");
            return Err(err);
        }
        *current = next.clone();
        Ok(next)
    }

    pub async fn toggle_theme(&self) -> Result<AppSettings, StorageError> {
        self.update(|settings| settings.theme = settings.theme.toggled()).await
    }
}

async fn read_persisted(storage: &dyn SlotStorage) -> AppSettings {
    let bytes = match storage.read(SETTINGS_SLOT).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("no persisted settings, using defaults");
            return AppSettings::default();
        }
        Err(err) => {
            warn!(error = %err, "failed to read settings, using defaults");
            return AppSettings::default();
        }
    };
    match serde_json::from_slice::<AppSettings>(&bytes) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "persisted settings are corrupt, using defaults");
            AppSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn load_without_persisted_value_returns_defaults() {
        let store = SettingsStore::open(Arc::new(MemoryStorage::new())).await;
        let settings = store.load().await;
        assert_eq!(
            settings,
            AppSettings {
                theme: Theme::Dark,
                language: Language::Ar,
                auto_save: true,
            }
        );
    }

    #[tokio::test]
    async fn update_writes_through() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SettingsStore::open(storage.clone()).await;
        store
            .update(|s| {
                s.language = Language::En;
                s.auto_save = false;
            })
            .await
            .unwrap();

        let reopened = SettingsStore::open(storage.clone()).await;
        let settings = reopened.get().await;
        assert_eq!(settings.language, Language::En);
        assert!(!settings.auto_save);

        let raw: serde_json::Value =
            serde_json::from_slice(&storage.read(SETTINGS_SLOT).await.unwrap().unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"theme": "dark", "language": "en", "autoSave": false}));
    }

    #[tokio::test]
    async fn toggle_theme_flips_between_light_and_dark() {
        let store = SettingsStore::open(Arc::new(MemoryStorage::new())).await;
        assert_eq!(store.toggle_theme().await.unwrap().theme, Theme::Light);
        assert_eq!(store.toggle_theme().await.unwrap().theme, Theme::Dark);
    }

    #[tokio::test]
    async fn corrupt_settings_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(SETTINGS_SLOT, b"{\"theme\": ").await.unwrap();
        let store = SettingsStore::open(storage).await;
        assert_eq!(store.get().await, AppSettings::default());
    }

    #[tokio::test]
    async fn partial_object_keeps_remaining_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(SETTINGS_SLOT, br#"{"theme":"light"}"#).await.unwrap();
        let settings = SettingsStore::open(storage).await.get().await;
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, Language::Ar);
        assert!(settings.auto_save);
    }
}
