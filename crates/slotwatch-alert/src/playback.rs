//! System audio players.

use std::ffi::OsStr;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use slotwatch_core::AlertError;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Available audio playback backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackBackend {
    /// macOS `afplay` command.
    Afplay,
    /// SoX `play` command.
    SoxPlay,
    /// Linux ALSA `aplay` command.
    Aplay,
}

impl PlaybackBackend {
    pub fn command(&self) -> &'static str {
        match self {
            PlaybackBackend::Afplay => "afplay",
            PlaybackBackend::SoxPlay => "play",
            PlaybackBackend::Aplay => "aplay",
        }
    }
}

impl fmt::Display for PlaybackBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Detect which audio playback backend is available.
pub async fn detect_playback_backend() -> Option<PlaybackBackend> {
    for backend in [PlaybackBackend::Afplay, PlaybackBackend::SoxPlay, PlaybackBackend::Aplay] {
        if command_exists(backend.command()).await {
            return Some(backend);
        }
    }
    None
}

/// Play a sound file, killing the player if it outlives `limit`.
pub(crate) async fn play_file(
    path: &Path,
    backend: PlaybackBackend,
    limit: Duration,
) -> Result<(), AlertError> {
    debug!(backend = %backend, path = %path.display(), "Playing alert sound");
    run_player(backend.command(), path, limit).await
}

async fn run_player(
    program: impl AsRef<OsStr>,
    path: &Path,
    limit: Duration,
) -> Result<(), AlertError> {
    let program = program.as_ref();
    let name = program.to_string_lossy();

    let mut child = Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AlertError(format!("failed to run {name}: {e}")))?;

    let waited = timeout(limit, child.wait()).await;
    let status = match waited {
        Ok(status) => status.map_err(|e| AlertError(format!("failed to wait for {name}: {e}")))?,
        Err(_) => {
            if let Err(e) = child.kill().await {
                warn!(player = %name, error = %e, "Failed to kill stalled player");
            }
            return Err(AlertError(format!(
                "{name} still playing after {}s, killed",
                limit.as_secs_f64()
            )));
        }
    };

    if !status.success() {
        return Err(AlertError(format!("{name} exited with status: {status}")));
    }

    Ok(())
}

/// Ring the terminal bell on stderr.
pub(crate) fn ring_bell() -> Result<(), AlertError> {
    let mut stderr = std::io::stderr();
    stderr
        .write_all(b"\x07")
        .and_then(|()| stderr.flush())
        .map_err(|e| AlertError(format!("failed to ring terminal bell: {e}")))
}

/// Check if a command exists on the system PATH.
async fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}
