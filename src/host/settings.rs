//! Settings persisted as JSON through the host storage

use tracing::info;

use crate::config::PresentationConfig;
use crate::constants::paths;
use crate::error::{FontError, Result};

use super::{SettingsStore, Storage};

pub struct JsonSettings<S> {
    storage: S,
    path: String,
}

impl<S: Storage> JsonSettings<S> {
    pub fn new(storage: S) -> Self {
        Self::at(storage, paths::SETTINGS_FILE)
    }

    pub fn at(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

impl<S: Storage> SettingsStore for JsonSettings<S> {
    async fn load(&self) -> Result<PresentationConfig> {
        if !self.storage.exists(&self.path).await {
            info!(path = %self.path, "No settings file found, using defaults");
            return Ok(PresentationConfig::default());
        }
        let contents = self
            .storage
            .read(&self.path)
            .await
            .map_err(|e| FontError::read(&self.path, e))?;
        // Missing keys fall back to their serde defaults
        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, config: &PresentationConfig) -> Result<()> {
        if let Some((parent, _)) = self.path.rsplit_once('/') {
            self.storage
                .mkdir(parent)
                .await
                .map_err(|e| FontError::write(parent, e))?;
        }
        let contents = serde_json::to_string_pretty(config)?;
        self.storage
            .write(&self.path, &contents)
            .await
            .map_err(|e| FontError::write(&self.path, e))?;
        info!(path = %self.path, "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontSelection;
    use crate::host::MemoryStorage;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_load_defaults_when_missing() {
        let settings = JsonSettings::new(MemoryStorage::new());
        assert_eq!(settings.load().await.unwrap(), PresentationConfig::default());
    }

    #[tokio::test]
    async fn test_load_merges_over_defaults() {
        let storage = Rc::new(MemoryStorage::new());
        storage.insert(paths::SETTINGS_FILE, r#"{"font": "Vazir.woff", "force_mode": true}"#);

        let config = JsonSettings::new(storage).load().await.unwrap();
        assert_eq!(config.font, FontSelection::Single("Vazir.woff".to_string()));
        assert!(config.force_mode);
        assert!(!config.custom_css_enabled);
        assert_eq!(config.font_dir, paths::FONT_DIR);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = Rc::new(MemoryStorage::new());
        let settings = JsonSettings::new(storage.clone());

        let config = PresentationConfig {
            font: FontSelection::AllFonts,
            custom_css_enabled: true,
            custom_css: "body { color: red; }".to_string(),
            ..PresentationConfig::default()
        };
        settings.save(&config).await.unwrap();

        let stored = String::from_utf8(storage.get(paths::SETTINGS_FILE).unwrap()).unwrap();
        assert!(stored.contains("\"All fonts\""));
        assert_eq!(settings.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_json_is_settings_error() {
        let storage = Rc::new(MemoryStorage::new());
        storage.insert(paths::SETTINGS_FILE, "{ not json");
        let err = JsonSettings::new(storage).load().await.unwrap_err();
        assert!(matches!(err, FontError::Settings(_)));
    }
}
