//! The booking alert.

use async_trait::async_trait;
use slotwatch_config::AlertConfig;
use slotwatch_core::{Alert, AlertError};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::playback::{detect_playback_backend, play_file, ring_bell, PlaybackBackend};

/// Plays the configured sound, falling back to the terminal bell.
pub struct SoundAlert {
    config: AlertConfig,
    backend: OnceCell<Option<PlaybackBackend>>,
}

impl SoundAlert {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            backend: OnceCell::new(),
        }
    }

    /// Player to use, detected once on first alert.
    async fn backend(&self) -> Option<PlaybackBackend> {
        *self
            .backend
            .get_or_init(|| async {
                let backend = detect_playback_backend().await;
                match backend {
                    Some(b) => debug!(backend = %b, "Audio player detected"),
                    None => debug!("No audio player found, alerts use the terminal bell"),
                }
                backend
            })
            .await
    }

    async fn play_once(&self) -> Result<(), AlertError> {
        let Some(path) = self.config.sound_file.as_deref() else {
            return ring_bell();
        };

        if !path.is_file() {
            ring_bell()?;
            return Err(AlertError(format!("sound file {} not found", path.display())));
        }

        match self.backend().await {
            Some(backend) => match play_file(path, backend, self.config.max_playback()).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    ring_bell()?;
                    Err(e)
                }
            },
            None => ring_bell(),
        }
    }
}

#[async_trait]
impl Alert for SoundAlert {
    /// Play the alert `repeat` times (at least once).
    ///
    /// The first failure is reported after all repeats have been tried.
    async fn play_alert(&self) -> Result<(), AlertError> {
        if !self.config.enabled {
            debug!("Alert disabled");
            return Ok(());
        }

        info!(repeat = self.config.repeat.max(1), "Playing booking alert");

        let mut first_error = None;
        for _ in 0..self.config.repeat.max(1) {
            if let Err(e) = self.play_once().await {
                warn!(error = %e, "Alert playback failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
