//! Order input loading.
//!
//! Orders are read from a file or stdin, either as a single JSON array or
//! as JSON Lines (one record per line).

use crate::models::OrderRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors for input that is not a usable collection of records.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSON on line {line}: {source}")]
    Line {
        line: usize,
        source: serde_json::Error,
    },
}

/// Where orders are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file on disk.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl InputSource {
    /// Build a source from the `--input` argument; `None` or `-` means stdin.
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p != Path::new("-") => InputSource::File(p.to_path_buf()),
            _ => InputSource::Stdin,
        }
    }

    /// Human-readable label for reports and logs.
    pub fn label(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "stdin".to_string(),
        }
    }
}

/// Read and parse every order from the given source.
pub fn load_orders(source: &InputSource) -> Result<Vec<OrderRecord>> {
    let text = match source {
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read orders from {}", path.display()))?,
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read orders from stdin")?;
            buf
        }
    };

    let orders = parse_orders(&text)
        .with_context(|| format!("Failed to parse orders from {}", source.label()))?;

    info!("Loaded {} orders from {}", orders.len(), source.label());
    Ok(orders)
}

/// Parse orders from text.
///
/// Text starting with `[` is a JSON array; anything else is JSON Lines.
/// Array elements or lines that are not objects become empty records.
pub fn parse_orders(text: &str) -> Result<Vec<OrderRecord>, InputError> {
    let text = text.trim_start_matches('\u{feff}').trim();

    if text.is_empty() {
        return Ok(Vec::new());
    }

    if text.starts_with('[') {
        let items: Vec<Value> = serde_json::from_str(text)?;
        return Ok(items.into_iter().map(OrderRecord::from).collect());
    }

    debug!("Input does not start with '[', reading as JSON Lines");

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<Value>(line)
                .map(OrderRecord::from)
                .map_err(|source| InputError::Line { line: i + 1, source })
        })
        .collect()
}
