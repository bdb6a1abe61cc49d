//! Data models for the order aggregator.
//!
//! This module contains the core data structures used throughout
//! the application for representing orders, totals, and reports.

use crate::analysis::top_customers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single order record: an unordered mapping of field name to raw JSON value.
///
/// Records are read-only input. Only the customer and amount fields matter
/// to the aggregator; everything else is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord(Map<String, Value>);

impl OrderRecord {
    /// Returns the raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns true if the record has no fields at all.
    #[allow(dead_code)] // Used by tests
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for OrderRecord {
    /// Objects become records; any other JSON value becomes an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// Names of the fields the aggregator reads from each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Field holding the customer identifier.
    pub customer: String,
    /// Field holding the order amount.
    pub amount: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            customer: "customer".to_string(),
            amount: "amount".to_string(),
        }
    }
}

/// Accumulated spending for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerTotal {
    /// Customer identifier (never empty).
    pub customer: String,
    /// Sum of all valid amounts for this customer.
    pub total: f64,
}

impl CustomerTotal {
    /// Creates a new customer total.
    pub fn new(customer: impl Into<String>, total: f64) -> Self {
        Self {
            customer: customer.into(),
            total,
        }
    }

    /// Returns the entry as a `(customer, total)` pair.
    #[allow(dead_code)] // Convenience for tuple-style consumers
    pub fn as_pair(&self) -> (&str, f64) {
        (&self.customer, self.total)
    }
}

/// Counters collected during one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Number of records read.
    pub orders_seen: usize,
    /// Records dropped because the customer was missing, empty, or not string-like.
    pub orders_skipped: usize,
    /// Records whose amount could not be coerced (counted as 0.0).
    pub invalid_amounts: usize,
    /// Number of distinct customers in the result.
    pub customers: usize,
    /// Sum of every customer total.
    pub grand_total: f64,
}

/// Result of aggregating a batch of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Customer totals, highest first.
    pub totals: Vec<CustomerTotal>,
    /// Counters for the pass.
    pub stats: AggregationStats,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the orders came from (file path or "stdin").
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Field names used to read each record.
    pub fields: FieldNames,
    /// Number of customers shown, if the ranking was truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
}

/// The complete spending report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Ranked customer totals (possibly truncated).
    pub totals: Vec<CustomerTotal>,
    /// Statistics for the whole input, independent of truncation.
    pub summary: AggregationStats,
}

impl Report {
    /// Builds a report from an aggregation, keeping at most `top` customers.
    pub fn new(metadata: ReportMetadata, aggregation: Aggregation) -> Self {
        let Aggregation { totals, stats } = aggregation;

        let totals = match metadata.top {
            Some(n) => top_customers(&totals, n),
            None => totals,
        };

        Self {
            metadata,
            totals,
            summary: stats,
        }
    }
}
