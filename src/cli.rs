// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::Pk;

/// Command-line arguments for `procwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procwatch",
    version,
    about = "Watch the progress and live output of an orchestrated calculation.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Procwatch.toml` in the current directory is used when it
    /// exists, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Process registry file; overrides `[source].registry`.
    #[arg(long, value_name = "PATH")]
    pub registry: Option<String>,

    /// Process to watch. Without it, only the candidate list is shown.
    #[arg(long, value_name = "PK")]
    pub pk: Option<Pk>,

    /// Print the selectable processes and exit.
    #[arg(long, conflicts_with = "once")]
    pub list: bool,

    /// Exit once the watched process is sealed and its output drained.
    #[arg(long, requires = "pk")]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_requires_pk() {
        assert!(CliArgs::try_parse_from(["procwatch", "--once"]).is_err());
        let args = CliArgs::try_parse_from(["procwatch", "--once", "--pk", "12"]).unwrap();
        assert!(args.once);
        assert_eq!(args.pk, Some(12));
    }

    #[test]
    fn list_and_once_conflict() {
        assert!(CliArgs::try_parse_from(["procwatch", "--list", "--once", "--pk", "1"]).is_err());
    }

    #[test]
    fn log_level_parses_value_enum() {
        let args = CliArgs::try_parse_from(["procwatch", "--log-level", "debug"]).unwrap();
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.config.is_none());
    }
}
