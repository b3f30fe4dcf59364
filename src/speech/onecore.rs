use std::sync::Mutex;
use anyhow::{Result, Context};
use futures_util::future::{BoxFuture, FutureExt};
use tokio::sync::oneshot;
use windows::{
    core::HSTRING,
    Foundation::TypedEventHandler,
    Media::{
        Core::MediaSource,
        Playback::MediaPlayer,
        SpeechSynthesis::SpeechSynthesizer,
    },
};

use super::{Finish, StopSignal, Synthesizer};

/// Windows OneCore voices. Playback is asynchronous, so the future waits on
/// the player's `MediaEnded` event; stopping pauses and closes the player.
pub struct OneCoreSynthesizer;

impl OneCoreSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

fn prepare_player(text: &HSTRING) -> windows::core::Result<MediaPlayer> {
    let synth = SpeechSynthesizer::new()?;
    let stream = synth.SynthesizeTextToStreamAsync(text)?.get()?;
    let source = MediaSource::CreateFromStream(&stream, &stream.ContentType()?)?;

    let player = MediaPlayer::new()?;
    player.SetSource(&source)?;
    Ok(player)
}

impl Synthesizer for OneCoreSynthesizer {
    fn name(&self) -> &'static str {
        "onecore"
    }

    fn speak(&self, text: &str, stop: StopSignal) -> BoxFuture<'static, Result<Finish>> {
        play(HSTRING::from(text), stop).boxed()
    }
}

async fn play(text: HSTRING, mut stop: StopSignal) -> Result<Finish> {
    // `.get()` blocks until synthesis is done
    let synthesis = tokio::task::spawn_blocking(move || prepare_player(&text));
    let player = tokio::select! {
        biased;
        _ = &mut stop => return Ok(Finish::Stopped),
        prepared = synthesis => prepared
            .context("Speech synthesis task panicked")?
            .context("Failed to synthesize speech")?,
    };

    let (ended_tx, ended_rx) = oneshot::channel::<()>();
    let ended_tx = Mutex::new(Some(ended_tx));
    let token = player
        .MediaEnded(&TypedEventHandler::new(move |_, _| {
            if let Some(tx) = ended_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Ok(())
        }))
        .context("Failed to subscribe to MediaEnded")?;

    player.Play().context("Failed to start playback")?;

    let finish = tokio::select! {
        _ = ended_rx => Finish::Completed,
        _ = &mut stop => {
            player.Pause().context("Failed to pause playback")?;
            Finish::Stopped
        }
    };

    player.RemoveMediaEnded(token)?;
    player.Close()?;
    Ok(finish)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_during_synthesis() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        let finish = play(HSTRING::from("こんにちは、世界。"), rx).await.unwrap();
        assert_eq!(finish, Finish::Stopped);
    }
}
