use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use anyhow::Result;

use crate::bridge::HostBridge;
use crate::state::Settings;
use crate::ui::{MountTarget, Root};

/// Lets the startup sequence run once per process.
pub struct BootstrapGuard {
    launched: AtomicBool,
}

impl BootstrapGuard {
    pub fn new() -> Self {
        Self { launched: AtomicBool::new(false) }
    }

    /// True for the first caller only.
    fn claim(&self) -> bool {
        !self.launched.swap(true, Ordering::SeqCst)
    }

    pub fn is_launched(&self) -> bool {
        self.launched.load(Ordering::SeqCst)
    }
}

/// What a successful startup leaves behind.
#[derive(Debug)]
pub struct Launch {
    pub root: Root,
    pub stop_after: Option<Duration>,
}

/// Application entry, called by the host once the page is ready: build the
/// root, mount it, then ask the host to speak the greeting.
///
/// The caller owns the delayed stop signal (see [`emit_stop_after`]) so that it
/// can run it on whatever executor the host provides.
pub fn launch(
    bridge: &dyn HostBridge,
    target: &dyn MountTarget,
    settings: &Settings,
    guard: &BootstrapGuard,
) -> Result<Launch> {
    if !guard.claim() {
        anyhow::bail!("Application already bootstrapped");
    }

    let mut root = Root::new(&settings.ui.root_text)?;
    root.mount(target, &settings.ui.mount_point)?;
    tracing::info!(
        "Root '{}' mounted at '{}'",
        root.text().unwrap_or_default(),
        settings.ui.mount_point
    );

    if let Err(e) = bridge.request_speech(&settings.speech.greeting) {
        tracing::error!("Failed to request speech: {}", e);
    }

    Ok(Launch {
        root,
        stop_after: settings.speech.stop_after_ms.map(Duration::from_millis),
    })
}

/// Outcome of a page becoming ready.
#[derive(Debug, PartialEq, Eq)]
pub enum PageReady {
    /// First load: the startup sequence ran. The caller schedules the stop signal.
    Launched { stop_after: Option<Duration> },
    /// Reload: the existing root was put back into the fresh page.
    Restored,
    /// Reload with no root to restore.
    Idle,
}

/// Host entry for every finished page load. The first load runs [`launch`]
/// and keeps the root in `root`. Later loads only re-render that root, since
/// a reload wipes the page but not the process.
pub fn page_ready(
    bridge: &dyn HostBridge,
    target: &dyn MountTarget,
    settings: &Settings,
    guard: &BootstrapGuard,
    root: &Mutex<Option<Root>>,
) -> Result<PageReady> {
    if guard.is_launched() {
        let root = root.lock().unwrap();
        let Some((root, selector)) = root.as_ref().and_then(|r| r.mounted_at().map(|s| (r, s))) else {
            tracing::debug!("Page reloaded with no root to restore");
            return Ok(PageReady::Idle);
        };
        target.attach(selector, &root.render())?;
        tracing::info!("Page reloaded; root restored at '{}'", selector);
        return Ok(PageReady::Restored);
    }

    let launch = launch(bridge, target, settings, guard)?;
    *root.lock().unwrap() = Some(launch.root);
    Ok(PageReady::Launched { stop_after: launch.stop_after })
}

/// The page reported that `selector` matched nothing, so the root it holds
/// never reached the page. Returns whether a root was dropped.
pub fn forget_unmounted_root(root: &Mutex<Option<Root>>, selector: &str) -> bool {
    let mut root = root.lock().unwrap();
    if root.as_ref().and_then(|r| r.mounted_at()) == Some(selector) {
        *root = None;
        true
    } else {
        false
    }
}

/// One-shot stop signal. Not cancellable: it fires unless the process exits first.
pub async fn emit_stop_after(bridge: &dyn HostBridge, delay: Duration) {
    tokio::time::sleep(delay).await;
    if let Err(e) = bridge.emit_stop_speech() {
        tracing::error!("Failed to emit stop signal: {}", e);
    }
}
