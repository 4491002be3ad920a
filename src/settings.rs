//! App settings and preferences
//!
//! Persisted separately from the pile in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SAVE_DEBOUNCE_MS, STORAGE_KEY};

/// App settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Persistence ===
    /// Key the pile is stored under
    pub storage_key: String,
    /// Quiet period after the last change before the pile is written
    pub save_debounce_ms: u64,

    // === Presentation ===
    /// Skip the falling-box animation for new entries
    pub reduced_motion: bool,
    /// Show the scene caption above the pile
    pub show_scene_labels: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            reduced_motion: false,
            show_scene_labels: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "backlog_goblin_settings";

    /// Apply `BACKLOG_GOBLIN_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("BACKLOG_GOBLIN_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                self.storage_key = key.to_string();
            }
        }
        if let Some(ms) = lookup("BACKLOG_GOBLIN_DEBOUNCE_MS") {
            match ms.trim().parse() {
                Ok(ms) => self.save_debounce_ms = ms,
                Err(_) => log::warn!("Ignoring invalid BACKLOG_GOBLIN_DEBOUNCE_MS={ms:?}"),
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Defaults plus environment overrides
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        settings.apply_overrides(|name| std::env::var(name).ok());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage_key, "backlog-entries");
        assert_eq!(settings.save_debounce_ms, DEFAULT_SAVE_DEBOUNCE_MS);
        assert!(settings.show_scene_labels);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BACKLOG_GOBLIN_KEY", "test-pile"),
            ("BACKLOG_GOBLIN_DEBOUNCE_MS", "0"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(settings.storage_key, "test-pile");
        assert_eq!(settings.save_debounce_ms, 0);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides(|name| match name {
            "BACKLOG_GOBLIN_KEY" => Some("   ".to_string()),
            "BACKLOG_GOBLIN_DEBOUNCE_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_saved_preferences_reload() {
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        settings.show_scene_labels = false;

        let json = serde_json::to_string(&settings).unwrap();
        let reloaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"reduced_motion":true}"#).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.storage_key, STORAGE_KEY);
    }
}
