//! slotwatch - appointment slot watcher
//!
//! Main entry point for the slotwatch CLI.

mod cli;
mod cmd_config;
mod cmd_watch;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the .slotwatch directory path.
fn slotwatch_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".slotwatch"))
        .unwrap_or_else(|| PathBuf::from(".slotwatch"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.slotwatch/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = slotwatch_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("slotwatch")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing for the whole program.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_timer(fmt::time::ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_target(true)
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_timer(fmt::time::ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing()?;

    match cli.command {
        None | Some(Commands::Run) => cmd_watch::run(&cli.config).await,
        Some(Commands::Once) => cmd_watch::once(&cli.config).await,
        Some(Commands::CheckConfig) => cmd_config::check_config(&cli.config),
        Some(Commands::ParseDate { text }) => cmd_config::parse_date(&text),
    }
}
