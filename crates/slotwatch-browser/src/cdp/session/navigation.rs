//! Navigation and waiting for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::cdp::error::CdpError;

use super::core::PageSession;

/// Delay between polls of page state.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long the resource count must stay unchanged to count as idle.
pub(super) const NETWORK_QUIET: Duration = Duration::from_millis(500);

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

const NETWORK_PROBE: &str =
    "[document.readyState, performance.getEntriesByType('resource').length]";

const VISIBLE_PROBE: &str = "if (!el) return false; \
    const r = el.getBoundingClientRect(); \
    const s = window.getComputedStyle(el); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';";

impl PageSession {
    /// Load `url` as a new document and wait for it.
    ///
    /// `Page.navigate` to the document already shown only moves the fragment
    /// and keeps the old page, so that case ends in a `Page.reload`.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let current = self.current_url().await?;
        let reload = same_document(&current, url);

        if current != url {
            let result = self
                .call("Page.navigate", Some(json!({"url": url})))
                .await?;

            if let Some(error) = result.get("errorText") {
                return Err(CdpError::NavigationFailed(
                    error.as_str().unwrap_or("Unknown error").to_string(),
                ));
            }
        }

        if reload {
            self.call("Page.reload", Some(json!({"ignoreCache": true})))
                .await?;
        }

        self.wait_for_load().await?;

        debug!(reload, "Navigated to {}", url);
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String, CdpError> {
        let href = self.evaluate("location.href").await?;
        Ok(href.as_str().unwrap_or_default().to_string())
    }

    /// Wait until the document is at least interactive.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let deadline = Instant::now() + LOAD_TIMEOUT;

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until the document is complete and no new resources have been
    /// fetched for a short quiet period.
    pub async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;
        let mut tracker = IdleTracker::new(NETWORK_QUIET);

        loop {
            let probe = self.evaluate(NETWORK_PROBE).await?;
            let complete = probe[0].as_str() == Some("complete");
            let resources = probe[1].as_u64().unwrap_or(0);

            let now = Instant::now();
            if tracker.observe(complete, resources, now) {
                return Ok(());
            }

            if now >= deadline {
                return Err(CdpError::Timeout(format!(
                    "Network not idle after {}ms",
                    timeout.as_millis()
                )));
            }

            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Whether the first element matching `selector` is rendered with a
    /// non-empty box and not hidden by style.
    pub async fn is_visible(&self, selector: &str) -> Result<bool, CdpError> {
        let visible = self.evaluate_on_selector(selector, VISIBLE_PROBE).await?;
        Ok(visible.as_bool().unwrap_or(false))
    }

    /// Wait for `selector` to become visible. A zero timeout probes once.
    pub async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(CdpError::Timeout(format!(
                    "Waiting for '{}' to become visible timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Wait for `selector` to appear in the DOM.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<i64, CdpError> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

/// Whether `target` differs from `current` at most in its fragment, which
/// the browser would treat as a same-document navigation.
pub(super) fn same_document(current: &str, target: &str) -> bool {
    match (Url::parse(current), Url::parse(target)) {
        (Ok(mut current), Ok(mut target)) => {
            current.set_fragment(None);
            target.set_fragment(None);
            current == target
        }
        _ => false,
    }
}

/// Tracks the resource count across polls to detect a quiet network.
pub(super) struct IdleTracker {
    quiet: Duration,
    last_count: Option<u64>,
    stable_since: Option<Instant>,
}

impl IdleTracker {
    pub(super) fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_count: None,
            stable_since: None,
        }
    }

    /// Record one poll; returns `true` once the page counts as idle.
    pub(super) fn observe(&mut self, complete: bool, resources: u64, now: Instant) -> bool {
        if self.last_count != Some(resources) {
            self.last_count = Some(resources);
            self.stable_since = Some(now);
        }

        match self.stable_since {
            Some(since) => complete && now.duration_since(since) >= self.quiet,
            None => false,
        }
    }
}
