//! Order analysis.
//!
//! Field coercion lives in `coerce`; the ranking pass lives in `aggregator`.

pub mod aggregator;
pub mod coerce;

pub use aggregator::*;
