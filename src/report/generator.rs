//! Report generation.
//!
//! This module renders a spending report as a plain-text table,
//! Markdown, or JSON.

use crate::analysis::generate_summary_text;
use crate::cli::OutputFormat;
use crate::models::{AggregationStats, CustomerTotal, Report, ReportMetadata};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Render a report in the requested format.
pub fn render_report(report: &Report, format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(generate_table_report(report, precision)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report, precision)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate a plain-text ranking table followed by the summary.
pub fn generate_table_report(report: &Report, precision: usize) -> String {
    let mut output = String::new();

    if report.totals.is_empty() {
        output.push_str("No customers found.\n");
    } else {
        let rows: Vec<(String, &str, String)> = report
            .totals
            .iter()
            .enumerate()
            .map(|(i, t)| {
                (
                    (i + 1).to_string(),
                    t.customer.as_str(),
                    format!("{:.*}", precision, t.total),
                )
            })
            .collect();

        let rank_width = column_width("Rank", rows.iter().map(|r| r.0.as_str()));
        let customer_width = column_width("Customer", rows.iter().map(|r| r.1));
        let total_width = column_width("Total", rows.iter().map(|r| r.2.as_str()));

        output.push_str(&format!(
            "{:<rw$}  {:<cw$}  {:>tw$}\n",
            "Rank",
            "Customer",
            "Total",
            rw = rank_width,
            cw = customer_width,
            tw = total_width
        ));
        output.push_str(&format!(
            "{}  {}  {}\n",
            "-".repeat(rank_width),
            "-".repeat(customer_width),
            "-".repeat(total_width)
        ));

        for (rank, customer, total) in &rows {
            // Pad by character count so non-ASCII names line up
            let padding = customer_width - customer.chars().count();
            output.push_str(&format!(
                "{:<rw$}  {}{}  {:>tw$}\n",
                rank,
                customer,
                " ".repeat(padding),
                total,
                rw = rank_width,
                tw = total_width
            ));
        }
    }

    output.push('\n');
    output.push_str(&generate_summary_text(&report.summary, precision));
    output.push('\n');

    output
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, precision: usize) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# OrderTally Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Ranking
    output.push_str(&generate_totals_section(&report.totals, precision));

    // Summary section
    output.push_str(&generate_summary_section(&report.summary, precision));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Fields:** `{}` / `{}`\n",
        metadata.fields.customer, metadata.fields.amount
    ));
    if let Some(top) = metadata.top {
        section.push_str(&format!("- **Showing:** top {}\n", top));
    }
    section.push('\n');

    section
}

/// Generate the ranked customer table.
fn generate_totals_section(totals: &[CustomerTotal], precision: usize) -> String {
    let mut section = String::new();

    section.push_str("## Customer Totals\n\n");

    if totals.is_empty() {
        section.push_str("No customers found.\n\n");
        return section;
    }

    section.push_str("| Rank | Customer | Total |\n");
    section.push_str("|---:|:---|---:|\n");

    for (i, entry) in totals.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {:.*} |\n",
            i + 1,
            escape_cell(&entry.customer),
            precision,
            entry.total
        ));
    }
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(stats: &AggregationStats, precision: usize) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Orders | Customers | Skipped | Non-numeric | **Grand Total** |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | **{:.*}** |\n\n",
        stats.orders_seen,
        stats.customers,
        stats.orders_skipped,
        stats.invalid_amounts,
        precision,
        stats.grand_total
    ));

    if stats.invalid_amounts > 0 {
        section.push_str(&format!(
            "> {} order(s) had a non-numeric amount and were counted as 0.\n\n",
            stats.invalid_amounts
        ));
    }

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by OrderTally*\n".to_string()
}

/// Generate a JSON report.
///
/// JSON has no NaN or infinity, so non-finite totals are written as `null`.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered output to a file, or stdout when no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .context("Failed to write report to stdout")?;
            handle.flush().context("Failed to flush stdout")
        }
    }
}
