//! Core session struct and CDP command dispatch.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cdp::client::{send_request, PendingMap, WsSink};
use crate::cdp::error::CdpError;

/// A session attached to a single page/target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    /// Shared with the client.
    pub(super) ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pub(super) pending: PendingMap,
    pub(super) request_id: Arc<AtomicU64>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
        pending: PendingMap,
        request_id: Arc<AtomicU64>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            ws_tx,
            pending,
            request_id,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        send_request(
            &self.ws_tx,
            &self.pending,
            &self.request_id,
            method,
            params,
            Some(&self.session_id),
        )
        .await
    }

    /// Enable the DOM agent for node lookups and box models. Page and
    /// Runtime stay disabled; their commands work without it.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("DOM.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }
}
