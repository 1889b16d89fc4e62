use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::process::PlayerTerminal;

/// Plays one address to completion.
pub(crate) trait PlaybackSink {
    /// Called once before a queue starts playing.
    fn begin_queue(&mut self) -> Result<()> {
        Ok(())
    }

    /// `Ok(false)` means the sink ran but reported failure.
    fn play(&mut self, address: &str) -> Result<bool>;

    /// Called once after the last address of a queue, even if it failed.
    fn end_queue(&mut self) {}
}

pub(crate) struct MpvSink {
    bin: PathBuf,
    terminal: Option<PlayerTerminal>,
}

impl MpvSink {
    pub(crate) fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            terminal: None,
        }
    }

    pub(crate) fn bin(&self) -> &Path {
        &self.bin
    }
}

impl PlaybackSink for MpvSink {
    fn begin_queue(&mut self) -> Result<()> {
        self.terminal = Some(PlayerTerminal::acquire()?);
        Ok(())
    }

    fn play(&mut self, address: &str) -> Result<bool> {
        let mut cmd = ProcessCommand::new(&self.bin);
        cmd.arg("--no-video")
            .arg(address)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let status = match &self.terminal {
            Some(terminal) => terminal.run(cmd)?,
            None => cmd.status().context("failed to launch player")?,
        };
        Ok(status.success())
    }

    fn end_queue(&mut self) {
        self.terminal = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaybackFailure {
    pub(crate) address: String,
    pub(crate) detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlaybackReport {
    pub(crate) played: usize,
    pub(crate) failures: Vec<PlaybackFailure>,
}

/// Plays `addresses` one after another. A failing address is logged and
/// recorded; the rest of the queue still plays.
pub(crate) fn play_all<S>(sink: &mut S, addresses: &[String]) -> PlaybackReport
where
    S: PlaybackSink + ?Sized,
{
    let mut report = PlaybackReport::default();
    if addresses.is_empty() {
        return report;
    }
    if let Err(err) = sink.begin_queue() {
        let detail = format!("{err:#}");
        warn!(error = %detail, "could not take over terminal, playing without it");
    }
    for (position, address) in addresses.iter().enumerate() {
        info!(address = %address, position = position + 1, total = addresses.len(), "playing");
        match sink.play(address) {
            Ok(true) => report.played += 1,
            Ok(false) => {
                warn!(address = %address, "player exited with failure");
                report.failures.push(PlaybackFailure {
                    address: address.clone(),
                    detail: "player exited with failure".to_string(),
                });
            }
            Err(err) => {
                let detail = format!("{err:#}");
                warn!(address = %address, error = %detail, "player failed to run");
                report.failures.push(PlaybackFailure {
                    address: address.clone(),
                    detail,
                });
            }
        }
    }
    sink.end_queue();
    report
}
