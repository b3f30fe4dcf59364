use anyhow::{Result, Context};
use serde_json::Value;
use tauri::{AppHandle, Manager};
use tauri_plugin_store::StoreExt;
use crate::state::Settings;

const STORE_FILE: &str = "settings.json";
const SETTINGS_KEY: &str = "settings";

pub fn load_settings(app_handle: &AppHandle) -> Settings {
    let store = match app_handle.store(STORE_FILE) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Failed to open settings store: {}. Using defaults.", e);
            return Settings::default();
        }
    };

    settings_from_value(store.get(SETTINGS_KEY))
}

fn settings_from_value(value: Option<Value>) -> Settings {
    match value {
        Some(value) => match serde_json::from_value::<Settings>(value) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to deserialize stored settings: {}. Using defaults.", e);
                Settings::default()
            }
        },
        None => {
            tracing::info!("No stored settings found. Using defaults.");
            Settings::default()
        }
    }
}

pub fn save_settings(app_handle: &AppHandle) -> Result<()> {
    let state = app_handle.state::<crate::state::AppState>();
    let settings = state.settings.lock().unwrap().clone();

    let store = app_handle
        .store(STORE_FILE)
        .context("Failed to open settings store for saving")?;
    let value = serde_json::to_value(&settings).context("Failed to serialize settings")?;
    store.set(SETTINGS_KEY, value);
    store.save().context("Failed to save settings store to disk")?;

    tracing::info!("Settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_use_defaults() {
        assert_eq!(settings_from_value(None), Settings::default());
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let value = serde_json::json!({ "ui": { "mount_point": 42 } });
        assert_eq!(settings_from_value(Some(value)), Settings::default());
    }

    #[test]
    fn test_stored_settings_are_loaded() {
        let value = serde_json::json!({
            "ui": { "root_text": "Bonjour" },
            "speech": { "greeting": "Bonjour le monde.", "stop_after_ms": 1200 }
        });
        let settings = settings_from_value(Some(value));

        assert_eq!(settings.ui.root_text, "Bonjour");
        assert_eq!(settings.ui.mount_point, "#app");
        assert_eq!(settings.speech.greeting, "Bonjour le monde.");
        assert_eq!(settings.speech.stop_after_ms, Some(1200));
    }
}
