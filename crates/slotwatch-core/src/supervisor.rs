//! The polling loop.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use slotwatch_config::{Config, SelectorsConfig, TimeoutsConfig};
use tracing::{error, info};

use crate::booking::{BookingEngine, BookingOutcome};
use crate::date::AppointmentDate;
use crate::driver::{Alert, PageDriver};
use crate::error::WatchError;
use crate::page_state::{Classification, PageStateClassifier};
use crate::signal::ShutdownSignal;
use crate::target::resolve_target;

/// Lifecycle of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Running,
    /// Terminal; reached only through a shutdown request.
    Stopped,
}

/// Iteration work that happens before the booking engine takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationStage {
    Navigate,
    Classify,
}

impl fmt::Display for IterationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationStage::Navigate => write!(f, "navigate"),
            IterationStage::Classify => write!(f, "classify"),
        }
    }
}

/// Everything one iteration decided, for the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    pub classification: Classification,
    pub target: AppointmentDate,
    pub outcome: BookingOutcome,
}

/// Repeats classify → resolve → attempt until shut down.
pub struct PollingSupervisor {
    deadline: AppointmentDate,
    session_url: String,
    interval: Duration,
    selectors: SelectorsConfig,
    timeouts: TimeoutsConfig,
    page: Arc<dyn PageDriver>,
    alert: Arc<dyn Alert>,
    shutdown: ShutdownSignal,
    state: Mutex<SupervisorState>,
}

impl PollingSupervisor {
    pub fn new(
        config: &Config,
        page: Arc<dyn PageDriver>,
        alert: Arc<dyn Alert>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            deadline: config.watch.deadline.into(),
            session_url: config.watch.session_url.clone(),
            interval: config.watch.polling_interval(),
            selectors: config.selectors.clone(),
            timeouts: config.timeouts.clone(),
            page,
            alert,
            shutdown,
            state: Mutex::new(SupervisorState::Running),
        }
    }

    pub fn state(&self) -> SupervisorState {
        *self.state.lock()
    }

    /// One full pass over a freshly loaded page.
    ///
    /// Nothing from a previous pass is reused; the page may have reloaded or
    /// navigated since.
    pub async fn run_iteration(&self) -> Result<IterationReport, WatchError> {
        let page = self.page.as_ref();

        page.navigate(&self.session_url)
            .await
            .map_err(|source| WatchError::Iteration {
                stage: IterationStage::Navigate,
                source,
            })?;

        let classification = PageStateClassifier::new(&self.selectors, &self.timeouts)
            .classify(page)
            .await
            .map_err(|source| WatchError::Iteration {
                stage: IterationStage::Classify,
                source,
            })?;

        let target = resolve_target(self.deadline, classification.existing);
        info!(deadline = %self.deadline, target = %target, "Target date resolved");

        let outcome = BookingEngine::new(&self.selectors, &self.timeouts, self.alert.as_ref())
            .attempt(page, classification.state, target)
            .await;

        Ok(IterationReport {
            classification,
            target,
            outcome,
        })
    }

    /// Poll until a shutdown is requested.
    ///
    /// Iteration failures are logged and never end the loop. Shutdown is
    /// honoured between iterations and during the pause, never mid-iteration.
    /// Returns the number of iterations run.
    pub async fn run(&self) -> u64 {
        let mut shutdown_rx = self.shutdown.subscribe();
        let mut iterations = 0u64;

        info!(
            deadline = %self.deadline,
            interval_secs = self.interval.as_secs(),
            "Polling started"
        );

        while !self.shutdown.is_shutdown_requested() {
            iterations += 1;

            match self.run_iteration().await {
                Ok(report) => info!(
                    iteration = iterations,
                    state = %report.classification.state,
                    target = %report.target,
                    outcome = %report.outcome,
                    "Iteration finished"
                ),
                Err(e) => error!(iteration = iterations, error = %e, "Iteration failed"),
            }

            if self.shutdown.is_shutdown_requested() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown_rx.recv() => {}
            }
        }

        *self.state.lock() = SupervisorState::Stopped;
        info!(iterations, "Polling stopped");
        iterations
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
