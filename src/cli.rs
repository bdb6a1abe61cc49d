//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Largest accepted value for --precision.
const MAX_PRECISION: usize = 12;

/// OrderTally - per-customer spending totals from order records
///
/// Reads orders as a JSON array or JSON Lines, sums the amount spent by
/// each customer, and prints the customers ranked by total (highest first).
///
/// Examples:
///   ordertally --input orders.json
///   cat orders.jsonl | ordertally --format json
///   ordertally -i orders.json --top 10 --format markdown -o report.md
///   ordertally -i export.json --customer-field buyer --amount-field price
///   ordertally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// File containing the orders
    ///
    /// Reads stdin when omitted or set to "-".
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (table, markdown, json)
    ///
    /// Defaults to the config file setting, or table.
    #[arg(long, value_name = "FORMAT", env = "ORDERTALLY_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Show only the top N customers
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Decimal places for printed totals
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Record field holding the customer identifier
    #[arg(long, value_name = "NAME")]
    pub customer_field: Option<String>,

    /// Record field holding the order amount
    #[arg(long, value_name = "NAME")]
    pub amount_field: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ordertally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, hides amount warnings)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ordertally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text table (default)
    #[default]
    Table,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(precision) = self.precision {
            if precision > MAX_PRECISION {
                return Err(format!("--precision must be at most {}", MAX_PRECISION));
            }
        }

        for (flag, value) in [
            ("--customer-field", &self.customer_field),
            ("--amount-field", &self.amount_field),
        ] {
            if matches!(value.as_deref(), Some(name) if name.trim().is_empty()) {
                return Err(format!("{} cannot be empty", flag));
            }
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if input != Path::new("-") && !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Returns the log filter: `RUST_LOG` when set and valid, else the
    /// level from the verbosity flags.
    pub fn log_filter(&self) -> EnvFilter {
        build_log_filter(self.log_level(), std::env::var("RUST_LOG").ok().as_deref())
    }
}

fn build_log_filter(level: tracing::Level, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("ordertally").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(args.top.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_format() {
        let args = parse(&["--format", "markdown"]);
        assert_eq!(args.format, Some(OutputFormat::Markdown));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["--verbose", "--quiet"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_top() {
        let args = parse(&["--top", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_precision_limit() {
        assert!(parse(&["--precision", "12"]).validate().is_ok());
        assert!(parse(&["--precision", "13"]).validate().is_err());
    }

    #[test]
    fn test_validation_empty_field_name() {
        let args = parse(&["--customer-field", " "]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input() {
        let args = parse(&["--input", "/nonexistent/orders.json"]);
        assert!(args.validate().is_err());

        // "-" means stdin and is always accepted
        let args = parse(&["--input", "-"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let args = parse(&["--init-config", "--top", "0"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_filter_from_flags() {
        use tracing::level_filters::LevelFilter;

        let filter = build_log_filter(tracing::Level::DEBUG, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        // Blank or malformed RUST_LOG falls back to the flag level
        let filter = build_log_filter(tracing::Level::ERROR, Some("  "));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
        let filter = build_log_filter(tracing::Level::INFO, Some("ordertally=loud"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_prefers_rust_log() {
        use tracing::level_filters::LevelFilter;

        let filter = build_log_filter(tracing::Level::INFO, Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&[]).log_level(), tracing::Level::INFO);
        assert_eq!(parse(&["-v"]).log_level(), tracing::Level::DEBUG);
        assert_eq!(parse(&["-q"]).log_level(), tracing::Level::ERROR);
    }
}
