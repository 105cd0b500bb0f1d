//! Capabilities the core consumes from the outside world.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AlertError, DriverError};

/// A located element.
///
/// Holds the selector rather than a live node reference: the page re-renders
/// freely, so the driver resolves the selector again on every use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    selector: String,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Browser page operations.
///
/// Every wait is bounded by the timeout passed in; running out of time must be
/// reported as [`DriverError::Timeout`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` in the page as a new document, even if the page already
    /// shows it.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Wait until the page stops loading resources.
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Wait until an element matching `selector` is rendered and visible.
    ///
    /// A zero timeout probes exactly once.
    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Wait until an element matching `selector` exists.
    async fn locate(&self, selector: &str, timeout: Duration) -> Result<ElementHandle, DriverError>;

    /// Wait for `selector` to become visible, then click it.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Text content of the element, `None` if it has none.
    async fn text_content(&self, element: &ElementHandle) -> Result<Option<String>, DriverError>;
}

/// Operator alert fired after a completed booking.
#[async_trait]
pub trait Alert: Send + Sync {
    async fn play_alert(&self) -> Result<(), AlertError>;
}
