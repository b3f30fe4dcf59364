use anyhow::{Result, Context};
use tauri::{AppHandle, Emitter};

/// Event that asks the backend to cut the current utterance short.
pub const STOP_SPEAK_EVENT: &str = "stop_speak";

/// The native capabilities the front end relies on.
pub trait HostBridge: Send + Sync {
    /// Fire-and-forget: returns once the request is handed to the host.
    fn request_speech(&self, text: &str) -> Result<()>;
    fn emit_stop_speech(&self) -> Result<()>;
}

pub struct TauriBridge {
    app_handle: AppHandle,
}

impl TauriBridge {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl HostBridge for TauriBridge {
    fn request_speech(&self, text: &str) -> Result<()> {
        let app_handle = self.app_handle.clone();
        let text = text.to_string();
        tauri::async_runtime::spawn(async move {
            if let Err(e) = crate::commands::speech::do_speak(&app_handle, &text).await {
                tracing::error!("Speech request failed: {}", e);
            }
        });
        Ok(())
    }

    fn emit_stop_speech(&self) -> Result<()> {
        tracing::info!("Emitting {}", STOP_SPEAK_EVENT);
        self.app_handle
            .emit(STOP_SPEAK_EVENT, ())
            .with_context(|| format!("Failed to emit {}", STOP_SPEAK_EVENT))
    }
}
