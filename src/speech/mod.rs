#[cfg(target_os = "windows")]
mod onecore;
#[cfg(unix)]
mod process;
mod service;

pub use service::SpeechService;

use std::sync::Arc;
use anyhow::Result;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

use crate::state::AppStatus;

/// Fires once to interrupt an utterance. A dropped sender counts as a stop.
pub type StopSignal = oneshot::Receiver<()>;

/// How an utterance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Completed,
    Stopped,
}

/// Text -> audible speech on the host. The returned future resolves when
/// playback ends or `stop` fires, whichever comes first.
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn speak(&self, text: &str, stop: StopSignal) -> BoxFuture<'static, Result<Finish>>;
}

/// Receives status transitions. Called with the utterance lock held, so
/// transitions arrive in the order they happened.
pub trait StatusSink: Send + Sync {
    fn status_changed(&self, status: AppStatus);
}

/// The native speech backend for the current OS
pub fn platform_synthesizer() -> Arc<dyn Synthesizer> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(onecore::OneCoreSynthesizer::new())
    }
    #[cfg(target_os = "macos")]
    {
        Arc::new(process::ProcessSynthesizer::say())
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Arc::new(process::ProcessSynthesizer::espeak())
    }
}
