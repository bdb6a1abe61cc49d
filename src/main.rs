//! OrderTally - per-customer spending totals
//!
//! A CLI tool that reads order records, sums the amount spent by each
//! customer, and reports customers ranked by total spent.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable input, bad config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod input;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use input::InputSource;
use models::{Report, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    debug!("OrderTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Aggregation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .ordertally.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings or `RUST_LOG`.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load orders, aggregate them, and write the report.
fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let source = InputSource::from_arg(args.input.as_deref());
    let orders = input::load_orders(&source)?;

    let fields = config.field_names();
    let aggregation = analysis::aggregate_orders(&orders, &fields);

    if aggregation.stats.invalid_amounts > 0 {
        warn!(
            "{} order(s) had non-numeric amounts and were counted as 0",
            aggregation.stats.invalid_amounts
        );
    }

    let metadata = ReportMetadata {
        source: source.label(),
        generated_at: Utc::now(),
        fields,
        top: config.top(),
    };
    let report = Report::new(metadata, aggregation);

    let output = report::render_report(&report, config.report.format, config.report.precision)?;
    report::write_output(&output, args.output.as_deref())?;

    if let Some(ref path) = args.output {
        info!("Report saved to {}", path.display());
    }

    debug!(
        "Processed {} orders in {:.3}s",
        report.summary.orders_seen,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
