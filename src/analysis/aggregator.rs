//! Per-customer spending aggregation.
//!
//! This module turns a batch of order records into customer totals ranked
//! by amount spent, and provides small helpers over the ranked result.

use super::coerce::{coerce_amount, customer_key, CustomerKey};
use crate::models::{Aggregation, AggregationStats, CustomerTotal, FieldNames, OrderRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Aggregate orders using the default `customer` / `amount` fields.
///
/// Returns one entry per customer, highest total first.
#[allow(dead_code)] // Library-style entry point; the CLI uses aggregate_orders
pub fn aggregate(orders: &[OrderRecord]) -> Vec<CustomerTotal> {
    aggregate_orders(orders, &FieldNames::default()).totals
}

/// Aggregate orders reading the given fields, collecting pass statistics.
///
/// Records without a usable customer are skipped. Amounts that cannot be
/// coerced count as 0.0 and produce a warning; they never abort the pass.
pub fn aggregate_orders(orders: &[OrderRecord], fields: &FieldNames) -> Aggregation {
    let mut totals = Totals::default();
    let mut stats = AggregationStats::default();

    for (index, order) in orders.iter().enumerate() {
        stats.orders_seen += 1;

        let customer = match customer_key(order.get(&fields.customer)) {
            CustomerKey::Valid(customer) => customer,
            CustomerKey::Missing => {
                stats.orders_skipped += 1;
                continue;
            }
            CustomerKey::NotStringLike(kind) => {
                debug!(
                    "Skipping order {}: customer field is a {}, not an identifier",
                    index, kind
                );
                stats.orders_skipped += 1;
                continue;
            }
        };

        let amount = match coerce_amount(order.get(&fields.amount)) {
            Ok(amount) => amount,
            Err(e) => {
                warn!(
                    "Non-numeric amount found for customer {}. Skipping amount. ({})",
                    customer, e
                );
                stats.invalid_amounts += 1;
                0.0
            }
        };

        totals.add(customer, amount);
    }

    let totals = totals.into_ranked();
    stats.customers = totals.len();
    stats.grand_total = grand_total(&totals);

    debug!(
        "Aggregated {} orders into {} customers ({} skipped)",
        stats.orders_seen, stats.customers, stats.orders_skipped
    );

    Aggregation { totals, stats }
}

/// Insertion-ordered accumulator keyed by customer.
#[derive(Default)]
struct Totals {
    index: HashMap<String, usize>,
    entries: Vec<CustomerTotal>,
}

impl Totals {
    /// Add `amount` to the customer's running total, creating it at 0.0 first.
    fn add(&mut self, customer: String, amount: f64) {
        let slot = match self.index.get(&customer) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(CustomerTotal::new(customer.clone(), 0.0));
                self.index.insert(customer, slot);
                slot
            }
        };

        self.entries[slot].total += amount;
    }

    /// Consume the accumulator, highest total first.
    ///
    /// The sort is stable, so equal totals keep first-seen order.
    fn into_ranked(self) -> Vec<CustomerTotal> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.total.total_cmp(&a.total));
        entries
    }
}

/// Get the first `n` customers of a ranked list.
pub fn top_customers(totals: &[CustomerTotal], n: usize) -> Vec<CustomerTotal> {
    totals.iter().take(n).cloned().collect()
}

/// Sum every customer total.
pub fn grand_total(totals: &[CustomerTotal]) -> f64 {
    totals.iter().fold(0.0, |acc, t| acc + t.total)
}

/// Generate a text summary of aggregation statistics.
pub fn generate_summary_text(stats: &AggregationStats, precision: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Orders Processed: {}", stats.orders_seen));
    lines.push(format!("- Customers: {}", stats.customers));
    lines.push(format!("- Skipped (no customer): {}", stats.orders_skipped));
    lines.push(format!("- Non-numeric amounts: {}", stats.invalid_amounts));
    lines.push(format!("- Grand Total: {:.*}", precision, stats.grand_total));

    lines.join("\n")
}
