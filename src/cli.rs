//! CLI definitions for slotwatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// slotwatch CLI.
#[derive(Parser)]
#[command(name = "slotwatch")]
#[command(about = "Watches an appointment booking page and books earlier slots")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/slotwatch.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Poll the booking page until interrupted (default)
    Run,

    /// Run a single polling iteration and print what it decided
    Once,

    /// Load and validate the configuration file
    CheckConfig,

    /// Parse a rendered date such as "Tu. 01.10.2024"
    ParseDate {
        /// Text to parse; may contain surrounding words
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["slotwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config/slotwatch.toml"));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["slotwatch", "once", "--config", "/etc/slotwatch.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Once)));
        assert_eq!(cli.config, PathBuf::from("/etc/slotwatch.toml"));
    }

    #[test]
    fn test_parse_date_takes_text() {
        let cli = Cli::try_parse_from(["slotwatch", "parse-date", "Tu. 01.10.2024"]).unwrap();
        match cli.command {
            Some(Commands::ParseDate { text }) => assert_eq!(text, "Tu. 01.10.2024"),
            _ => panic!("expected parse-date"),
        }
    }

    #[test]
    fn test_check_config_subcommand_name() {
        let cli = Cli::try_parse_from(["slotwatch", "check-config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["slotwatch", "daemon"]).is_err());
    }
}
