use std::process::Stdio;
use anyhow::{Result, Context};
use futures_util::future::{BoxFuture, FutureExt};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Finish, StopSignal, Synthesizer};

/// Speech through a command-line synthesizer that reads the text on stdin
/// (`say` on macOS, `espeak-ng` elsewhere). Stopping kills the process.
pub struct ProcessSynthesizer {
    program: &'static str,
    args: &'static [&'static str],
    /// Passed as `-v <voice>` when the text is Japanese; the default voices are English.
    japanese_voice: Option<&'static str>,
}

impl ProcessSynthesizer {
    pub fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args, japanese_voice: None }
    }

    pub fn with_japanese_voice(mut self, voice: &'static str) -> Self {
        self.japanese_voice = Some(voice);
        self
    }

    #[allow(dead_code)]
    pub fn say() -> Self {
        // `say` reads stdin when no text argument is given
        Self::new("say", &[]).with_japanese_voice("Kyoko")
    }

    #[allow(dead_code)]
    pub fn espeak() -> Self {
        Self::new("espeak-ng", &["--stdin"]).with_japanese_voice("ja")
    }

    fn command(&self, text: &str) -> Command {
        let mut command = Command::new(self.program);
        command.args(self.args);
        if let Some(voice) = self.japanese_voice.filter(|_| is_japanese(text)) {
            command.arg("-v").arg(voice);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

/// Any kana or CJK ideograph
fn is_japanese(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}'   // hiragana
            | '\u{30A0}'..='\u{30FF}' // katakana
            | '\u{4E00}'..='\u{9FFF}')
    })
}

impl Synthesizer for ProcessSynthesizer {
    fn name(&self) -> &'static str {
        self.program
    }

    fn speak(&self, text: &str, stop: StopSignal) -> BoxFuture<'static, Result<Finish>> {
        run(self.command(text), self.program, text.to_string(), stop).boxed()
    }
}

async fn run(
    mut command: Command,
    program: &'static str,
    text: String,
    mut stop: StopSignal,
) -> Result<Finish> {
    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to start speech synthesizer '{}'", program))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()).await {
            Ok(()) => {}
            // The exit status below tells us whether that mattered
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("'{}' closed stdin early", program);
            }
            Err(e) => return Err(e).context("Failed to write text to synthesizer"),
        }
    }

    tokio::select! {
        status = child.wait() => {
            let status = status.context("Failed to wait for synthesizer")?;
            if !status.success() {
                anyhow::bail!("'{}' exited with {}", program, status);
            }
            Ok(Finish::Completed)
        }
        _ = &mut stop => {
            child.kill().await.context("Failed to stop synthesizer")?;
            Ok(Finish::Stopped)
        }
    }
}
