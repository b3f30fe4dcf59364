use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use anyhow::Result;
use tokio::sync::oneshot;

use super::{Finish, StatusSink, Synthesizer};
use crate::state::AppStatus;

struct Utterance {
    id: u64,
    stop: oneshot::Sender<()>,
}

/// Owns the synthesizer and at most one in-flight utterance.
pub struct SpeechService {
    synthesizer: Arc<dyn Synthesizer>,
    active: Mutex<Option<Utterance>>,
    next_id: AtomicU64,
}

impl SpeechService {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        tracing::info!("Speech backend: {}", synthesizer.name());
        Self {
            synthesizer,
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Speak `text`, interrupting whatever is currently playing.
    ///
    /// `sink` hears `Speaking` when playback starts from idle and `Idle` once
    /// the last utterance ends. Handing over to a new utterance is silent.
    pub async fn speak(&self, text: &str, sink: &dyn StatusSink) -> Result<Finish> {
        if text.trim().is_empty() {
            anyhow::bail!("Nothing to speak: text is empty");
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        {
            let mut active = self.active.lock().unwrap();
            match active.replace(Utterance { id, stop: stop_tx }) {
                Some(previous) => {
                    tracing::info!("Interrupting utterance #{} for #{}", previous.id, id);
                    let _ = previous.stop.send(());
                }
                None => sink.status_changed(AppStatus::Speaking),
            }
        }

        tracing::info!("Speaking #{}: '{}'", id, text);
        let result = self.synthesizer.speak(text, stop_rx).await;

        {
            let mut active = self.active.lock().unwrap();
            if active.as_ref().map(|u| u.id) == Some(id) {
                *active = None;
                sink.status_changed(AppStatus::Idle);
            }
        }

        match &result {
            Ok(finish) => tracing::info!("Utterance #{} finished: {:?}", id, finish),
            Err(e) => tracing::error!("Utterance #{} failed: {}", id, e),
        }
        result
    }

    /// Interrupt the current utterance. Returns false when nothing was playing.
    pub fn stop(&self, sink: &dyn StatusSink) -> bool {
        let mut active = self.active.lock().unwrap();
        match active.take() {
            Some(utterance) => {
                sink.status_changed(AppStatus::Idle);
                let delivered = utterance.stop.send(()).is_ok();
                if delivered {
                    tracing::info!("Stopped utterance #{}", utterance.id);
                }
                delivered
            }
            None => {
                tracing::debug!("Stop requested with nothing playing");
                false
            }
        }
    }

    pub fn status(&self) -> AppStatus {
        match *self.active.lock().unwrap() {
            Some(_) => AppStatus::Speaking,
            None => AppStatus::Idle,
        }
    }
}
