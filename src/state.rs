use std::sync::Mutex;
use serde::{Serialize, Deserialize};

use crate::bootstrap::BootstrapGuard;
use crate::speech::SpeechService;
use crate::ui::Root;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    Idle,
    Speaking,
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl AppStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Speaking => "speaking",
        }
    }
}

pub struct AppState {
    pub settings: Mutex<Settings>,
    pub speech: SpeechService,
    pub bootstrap: BootstrapGuard,
    pub root: Mutex<Option<Root>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(Settings::default()),
            speech: SpeechService::new(crate::speech::platform_synthesizer()),
            bootstrap: BootstrapGuard::new(),
            root: Mutex::new(None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub mount_point: String,
    pub root_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            mount_point: "#app".to_string(),
            root_text: "Hello".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub greeting: String,
    /// Delay before the startup `stop_speak` signal. `None` lets the greeting play out.
    pub stop_after_ms: Option<u64>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            greeting: "こんにちは、世界。".to_string(),
            stop_after_ms: Some(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.ui.mount_point, "#app");
        assert_eq!(settings.ui.root_text, "Hello");
        assert_eq!(settings.speech.greeting, "こんにちは、世界。");
        assert_eq!(settings.speech.stop_after_ms, Some(500));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let value = serde_json::json!({
            "speech": { "stop_after_ms": null }
        });
        let settings: Settings = serde_json::from_value(value).unwrap();

        assert_eq!(settings.speech.stop_after_ms, None);
        assert_eq!(settings.speech.greeting, "こんにちは、世界。");
        assert_eq!(settings.ui, UiSettings::default());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AppStatus::Speaking).unwrap(), "\"speaking\"");
        assert_eq!(AppStatus::default().as_str(), "idle");
    }
}
