//! Browser manager errors and config helpers.

use std::path::PathBuf;

use slotwatch_config::BrowserConfig;
use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome or Chromium.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Failed to open page: {0}")]
    PageFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                BrowserError::ConnectionFailed(msg)
            }
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::PageFailed(e.to_string()),
        }
    }
}

/// Profile directory, defaulting to `~/.slotwatch/browser-profile`.
pub(super) fn profile_dir(config: &BrowserConfig) -> PathBuf {
    config.profile_dir.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".slotwatch")
            .join("browser-profile")
    })
}

/// CDP HTTP endpoint for the configured port.
pub(super) fn endpoint(config: &BrowserConfig) -> String {
    format!("http://localhost:{}", config.debug_port)
}
