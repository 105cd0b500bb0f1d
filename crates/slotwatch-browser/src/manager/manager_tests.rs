use std::path::PathBuf;

use slotwatch_config::BrowserConfig;

use super::manager_types::{endpoint, profile_dir};
use super::*;
use crate::cdp::CdpError;

#[test]
fn test_endpoint_uses_configured_port() {
    let config = BrowserConfig {
        debug_port: 9333,
        ..BrowserConfig::default()
    };
    assert_eq!(endpoint(&config), "http://localhost:9333");
}

#[test]
fn test_default_profile_dir() {
    let profile = profile_dir(&BrowserConfig::default());
    assert!(profile.ends_with(".slotwatch/browser-profile"));
}

#[test]
fn test_configured_profile_dir() {
    let config = BrowserConfig {
        profile_dir: Some(PathBuf::from("/tmp/watch-profile")),
        ..BrowserConfig::default()
    };
    assert_eq!(profile_dir(&config), PathBuf::from("/tmp/watch-profile"));
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ConnectionFailed("timeout".to_string());
    assert_eq!(err.to_string(), "Connection failed: timeout");

    let err = BrowserError::LaunchFailed("permission denied".to_string());
    assert_eq!(err.to_string(), "Failed to launch Chrome: permission denied");
}

#[test]
fn test_cdp_error_mapping() {
    let err: BrowserError = CdpError::ChromeNotAvailable("http://localhost:9222".to_string()).into();
    assert!(matches!(err, BrowserError::ConnectionFailed(_)));

    let err: BrowserError = CdpError::SessionClosed.into();
    assert!(matches!(err, BrowserError::NotConnected));

    let err: BrowserError = CdpError::InvalidResponse("Missing sessionId".to_string()).into();
    assert!(matches!(err, BrowserError::PageFailed(_)));
}

#[test]
fn test_find_chrome() {
    if let Some(path) = BrowserManager::find_chrome() {
        assert!(path.exists());
    }
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserConfig::default());
    assert!(manager.close().await.is_ok());
    assert!(manager.shutdown().await.is_ok());
}
