//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ordertally.toml` files.

use crate::cli::OutputFormat;
use crate::models::FieldNames;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".ordertally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Which fields of each order record to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field holding the customer identifier.
    #[serde(default = "default_customer_field")]
    pub customer_field: String,

    /// Field holding the order amount.
    #[serde(default = "default_amount_field")]
    pub amount_field: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            customer_field: default_customer_field(),
            amount_field: default_amount_field(),
        }
    }
}

fn default_customer_field() -> String {
    "customer".to_string()
}

fn default_amount_field() -> String {
    "amount".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Show only the top N customers (0 = all).
    #[serde(default)]
    pub top: usize,

    /// Decimal places for printed totals.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            top: 0,
            precision: default_precision(),
        }
    }
}

fn default_precision() -> usize {
    2
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.ordertally.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref field) = args.customer_field {
            self.input.customer_field = field.clone();
        }
        if let Some(ref field) = args.amount_field {
            self.input.amount_field = field.clone();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(top) = args.top {
            self.report.top = top;
        }
        if let Some(precision) = args.precision {
            self.report.precision = precision;
        }
    }

    /// Field names to read from each record.
    pub fn field_names(&self) -> FieldNames {
        FieldNames {
            customer: self.input.customer_field.clone(),
            amount: self.input.amount_field.clone(),
        }
    }

    /// Ranking cutoff, `None` when every customer should be shown.
    pub fn top(&self) -> Option<usize> {
        (self.report.top > 0).then_some(self.report.top)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
