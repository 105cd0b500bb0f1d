//! `check-config` and `parse-date` commands.

use std::path::Path;

use slotwatch_config::{Config, ConfigError, ConfigLoader, ConfigValidator};
use slotwatch_core::DateParser;
use tracing::{info, warn};

/// Load the file and validate it, logging every warning.
pub(crate) fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = ConfigLoader::load(path)?;

    let validation = ConfigValidator::validate(&config);
    for error in &validation.errors {
        tracing::error!(field = %error.path, "{}", error.message);
    }
    for warning in validation.into_result()? {
        warn!(field = %warning.path, "{}", warning.message);
    }

    info!(
        path = %path.display(),
        deadline = %config.watch.deadline,
        interval_secs = config.watch.polling_interval_seconds,
        "Configuration loaded"
    );
    Ok(config)
}

/// Validate the configuration and print the outcome.
pub(crate) fn check_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let validation = ConfigValidator::validate(&config);

    for error in &validation.errors {
        println!("error   {}: {}", error.path, error.message);
    }
    for warning in &validation.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }

    let warnings = validation.into_result()?;
    println!(
        "{} is valid ({} warning{})",
        path.display(),
        warnings.len(),
        if warnings.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Parse a rendered date, strictly first, then inside surrounding text.
pub(crate) fn parse_date(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let date = DateParser::parse(text).or_else(|_| DateParser::extract(text))?;
    println!("{}", date);
    Ok(())
}
