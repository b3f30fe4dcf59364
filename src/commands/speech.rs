use tauri::{AppHandle, Emitter, Manager};
use anyhow::Result;

use crate::speech::{Finish, StatusSink};
use crate::state::{AppState, AppStatus};

/// Tauri command: speak text aloud, resolving when playback ends or is interrupted
#[tauri::command]
pub async fn speak(app_handle: AppHandle, text: String) -> Result<(), String> {
    tracing::info!("speak: {}", text);
    do_speak(&app_handle, &text)
        .await
        .map(|_| ())
        .map_err(|e| format!("failed to do speak: {}", e))
}

/// Tauri command: interrupt the current utterance
#[tauri::command]
pub fn stop_speaking(app_handle: AppHandle) -> Result<bool, String> {
    let state = app_handle.state::<AppState>();
    Ok(state.speech.stop(&app_handle))
}

/// Tauri command: get current app status
#[tauri::command]
pub fn get_status(app_handle: AppHandle) -> Result<String, String> {
    let state = app_handle.state::<AppState>();
    let status = state.speech.status();
    serde_json::to_string(&status).map_err(|e| e.to_string())
}

/// Internal: speak, reporting status transitions to the page
pub async fn do_speak(app_handle: &AppHandle, text: &str) -> Result<Finish> {
    let state = app_handle.state::<AppState>();
    state.speech.speak(text, app_handle).await
}

impl StatusSink for AppHandle {
    fn status_changed(&self, status: AppStatus) {
        tracing::info!("Status: {}", status.as_str());
        let _ = self.emit("speech-status", serde_json::json!({"status": status.as_str()}));
    }
}
