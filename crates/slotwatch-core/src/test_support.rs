//! In-memory doubles for the page driver and the alert.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::{Alert, ElementHandle, PageDriver};
use crate::error::{AlertError, DriverError};
use crate::signal::ShutdownSignal;

/// A static page: fixed visible selectors and texts, recorded clicks.
#[derive(Default)]
pub struct FakePage {
    visible: HashSet<String>,
    texts: HashMap<String, String>,
    failing_clicks: HashSet<String>,
    busy_network: bool,
    unresponsive: bool,
    hung_renderer: bool,
    failing_navigation: bool,
    clicks: Mutex<Vec<String>>,
    navigations: AtomicUsize,
    stop_after: Option<(usize, ShutdownSignal)>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(mut self, selector: &str) -> Self {
        self.visible.insert(selector.to_string());
        self
    }

    /// Visible element with text content.
    pub fn text(mut self, selector: &str, text: &str) -> Self {
        self.visible.insert(selector.to_string());
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn failing_click(mut self, selector: &str) -> Self {
        self.failing_clicks.insert(selector.to_string());
        self
    }

    /// Network never goes idle.
    pub fn busy_network(mut self) -> Self {
        self.busy_network = true;
        self
    }

    /// Every call fails as if the browser went away.
    pub fn unresponsive(mut self) -> Self {
        self.unresponsive = true;
        self
    }

    /// Network looks busy and every probe goes unanswered.
    pub fn hung_renderer(mut self) -> Self {
        self.hung_renderer = true;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.failing_navigation = true;
        self
    }

    /// Request shutdown once `count` navigations have happened.
    pub fn stop_after(mut self, count: usize, signal: ShutdownSignal) -> Self {
        self.stop_after = Some((count, signal));
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    fn check_alive(&self) -> Result<(), DriverError> {
        if self.unresponsive {
            Err(DriverError::SessionClosed)
        } else if self.hung_renderer {
            Err(DriverError::Unresponsive("Runtime.evaluate".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let count = self.navigations.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((limit, signal)) = &self.stop_after {
            if count >= *limit {
                signal.request_shutdown();
            }
        }
        self.check_alive()?;
        if self.failing_navigation {
            return Err(DriverError::NavigationFailed(url.to_string()));
        }
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> Result<(), DriverError> {
        if self.unresponsive {
            return Err(DriverError::SessionClosed);
        }
        if self.busy_network || self.hung_renderer {
            return Err(DriverError::Timeout("network idle".to_string()));
        }
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.check_alive()?;
        if self.visible.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::Timeout(selector.to_string()))
        }
    }

    async fn locate(&self, selector: &str, _timeout: Duration) -> Result<ElementHandle, DriverError> {
        self.check_alive()?;
        if self.visible.contains(selector) {
            Ok(ElementHandle::new(selector))
        } else {
            Err(DriverError::Timeout(selector.to_string()))
        }
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.wait_for_visible(selector, timeout).await?;
        if self.failing_clicks.contains(selector) {
            return Err(DriverError::Other(format!("click on {} was not delivered", selector)));
        }
        self.clicks.lock().unwrap().push(selector.to_string());
        Ok(())
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<Option<String>, DriverError> {
        self.check_alive()?;
        Ok(self.texts.get(element.selector()).cloned())
    }
}

/// Alert double that counts invocations.
#[derive(Default)]
pub struct CountingAlert {
    plays: AtomicUsize,
    fail: bool,
}

impl CountingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            plays: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Alert for CountingAlert {
    async fn play_alert(&self) -> Result<(), AlertError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AlertError("no audio device".to_string()))
        } else {
            Ok(())
        }
    }
}
