//! `PageDriver` backed by a CDP page session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use slotwatch_core::{DriverError, ElementHandle, PageDriver};
use tracing::debug;

use crate::cdp::PageSession;

/// Drives one attached page.
pub struct CdpPageDriver {
    session: Arc<PageSession>,
}

impl CdpPageDriver {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PageDriver for CdpPageDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.session.navigate(url).await?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), DriverError> {
        Ok(self.session.wait_for_network_idle(timeout).await?)
    }

    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        Ok(self.session.wait_for_visible(selector, timeout).await?)
    }

    async fn locate(&self, selector: &str, timeout: Duration) -> Result<ElementHandle, DriverError> {
        self.session.wait_for_selector(selector, timeout).await?;
        Ok(ElementHandle::new(selector))
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.session.wait_for_visible(selector, timeout).await?;
        self.session.click_selector(selector).await?;
        debug!(selector = %selector, "Clicked");
        Ok(())
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<Option<String>, DriverError> {
        Ok(self.session.text_content(element.selector()).await?)
    }
}
