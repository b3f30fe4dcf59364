mod bootstrap;
mod bridge;
mod commands;
mod persistence;
mod speech;
mod state;
mod ui;

use bootstrap::PageReady;
use bridge::TauriBridge;
use state::AppState;
use tauri::{
    webview::{PageLoadEvent, PageLoadPayload},
    Listener, Manager, Webview,
};
use ui::webview::{MountFailed, WebviewTarget, MOUNT_FAILED_EVENT};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Hello Speak v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            commands::speech::speak,
            commands::speech::stop_speaking,
            commands::speech::get_status,
            commands::settings::get_settings,
            commands::settings::update_settings,
            commands::settings::get_app_version,
        ])
        .on_page_load(on_page_load)
        .setup(|app| {
            let loaded = persistence::load_settings(app.handle());
            {
                let state = app.state::<AppState>();
                *state.settings.lock().unwrap() = loaded;
                tracing::info!("Settings loaded from store");
            }

            // The stop signal can come from our own timer or from the page
            let handle = app.handle().clone();
            app.listen_any(bridge::STOP_SPEAK_EVENT, move |_event| {
                let state = handle.state::<AppState>();
                if state.speech.stop(&handle) {
                    tracing::info!("{}: speech interrupted", bridge::STOP_SPEAK_EVENT);
                } else {
                    tracing::debug!("{}: nothing to interrupt", bridge::STOP_SPEAK_EVENT);
                }
            });

            // The page only learns about a missing mount point after `eval`
            // has returned, so the stored root is dropped here.
            let handle = app.handle().clone();
            app.listen_any(MOUNT_FAILED_EVENT, move |event| {
                match serde_json::from_str::<MountFailed>(event.payload()) {
                    Ok(failure) => {
                        tracing::error!("Mount point '{}' not found in page", failure.selector);
                        let state = handle.state::<AppState>();
                        bootstrap::forget_unmounted_root(&state.root, &failure.selector);
                    }
                    Err(e) => tracing::error!("Malformed {} event: {}", MOUNT_FAILED_EVENT, e),
                }
            });

            tracing::info!("App setup complete");

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn on_page_load(webview: &Webview, payload: &PageLoadPayload<'_>) {
    if webview.label() != "main" || !matches!(payload.event(), PageLoadEvent::Finished) {
        return;
    }

    let app_handle = webview.app_handle().clone();
    let state = app_handle.state::<AppState>();
    let settings = state.settings.lock().unwrap().clone();
    let bridge = TauriBridge::new(app_handle.clone());
    let target = WebviewTarget::new(webview);

    let ready = bootstrap::page_ready(&bridge, &target, &settings, &state.bootstrap, &state.root);
    match ready {
        Ok(PageReady::Launched { stop_after: Some(delay) }) => {
            tracing::info!("Stop signal scheduled in {}ms", delay.as_millis());
            tauri::async_runtime::spawn(async move {
                bootstrap::emit_stop_after(&bridge, delay).await;
            });
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Startup failed: {}", e),
    }
}
