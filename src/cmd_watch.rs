//! `run` and `once` commands: wire the browser and alert into the supervisor.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use slotwatch_alert::SoundAlert;
use slotwatch_browser::{BrowserError, BrowserManager, CdpPageDriver};
use slotwatch_config::Config;
use slotwatch_core::{Alert, IterationReport, PageDriver, PollingSupervisor, ShutdownSignal, WatchError};
use tracing::{error, info, warn};

use crate::cmd_config::load_config;

/// Poll until SIGINT/SIGTERM.
pub(crate) async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    info!("Starting slotwatch v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = ShutdownSignal::new();
    shutdown.install_os_handlers()?;

    let manager = BrowserManager::new(config.browser.clone());
    match build_supervisor(&manager, &config, shutdown).await {
        Ok(supervisor) => {
            let iterations = run_then_release(async move { supervisor.run().await }, release(&manager)).await?;
            info!(iterations, "slotwatch stopped");
            Ok(())
        }
        Err(e) => {
            release(&manager).await;
            Err(e.into())
        }
    }
}

/// Drive `work` on its own task, then run `cleanup` however it ended.
///
/// A panic in `work` comes back as an error after `cleanup` has run.
async fn run_then_release<T, W, C>(work: W, cleanup: C) -> Result<T, Box<dyn std::error::Error>>
where
    T: Send + 'static,
    W: Future<Output = T> + Send + 'static,
    C: Future<Output = ()>,
{
    let joined = tokio::spawn(work).await;
    cleanup.await;
    joined.map_err(|e| format!("polling loop aborted: {}", e).into())
}

/// Run one iteration and print its report.
pub(crate) async fn once(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let manager = BrowserManager::new(config.browser.clone());
    let result: Result<IterationReport, Box<dyn std::error::Error>> =
        match build_supervisor(&manager, &config, ShutdownSignal::new()).await {
            Ok(supervisor) => supervisor
                .run_iteration()
                .await
                .map_err(|e: WatchError| e.into()),
            Err(e) => Err(e.into()),
        };

    release(&manager).await;

    let report = result?;
    let existing = report
        .classification
        .existing
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "state={} existing={} target={} outcome={}",
        report.classification.state, existing, report.target, report.outcome
    );
    Ok(())
}

/// Open the watcher page and put a supervisor on top of it.
async fn build_supervisor(
    manager: &BrowserManager,
    config: &Config,
    shutdown: ShutdownSignal,
) -> Result<Arc<PollingSupervisor>, BrowserError> {
    let session = manager.open_page().await.inspect_err(|e| {
        error!(error = %e, "Could not open the browser page");
    })?;

    let page: Arc<dyn PageDriver> = Arc::new(CdpPageDriver::new(session));
    let alert: Arc<dyn Alert> = Arc::new(SoundAlert::new(config.alert.clone()));
    Ok(Arc::new(PollingSupervisor::new(config, page, alert, shutdown)))
}

async fn release(manager: &BrowserManager) {
    if let Err(e) = manager.shutdown().await {
        warn!(error = %e, "Browser shutdown failed");
    }
}
