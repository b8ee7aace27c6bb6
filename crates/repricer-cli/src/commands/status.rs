use crate::OutputFormat;
use anyhow::{Context, Result};
use console::style;
use repricer_core::inventory::{InventoryTable, RowStatus};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub file: String,
    pub rows: usize,
    pub has_header: bool,
    /// Rows without a status; these are picked up by the next run
    pub pending: usize,
    pub counts: Vec<StatusCount>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: RowStatus,
    pub rows: usize,
}

/// Per-status counts of an inventory file, without touching it
pub fn status_report(file: &Path) -> Result<StatusReport> {
    let table = InventoryTable::load(file)
        .with_context(|| format!("Could not open inventory {}", file.display()))?;

    let counts: Vec<StatusCount> = table
        .status_counts()
        .into_iter()
        .map(|(status, rows)| StatusCount { status, rows })
        .collect();

    let pending = counts
        .iter()
        .find(|c| c.status == RowStatus::Unset)
        .map_or(0, |c| c.rows);

    Ok(StatusReport {
        file: file.display().to_string(),
        rows: table.len(),
        has_header: table.has_header(),
        pending,
        counts,
    })
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::debug!("Reading statuses from {}", file.display());
    let report = status_report(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => {
            println!("{}", style(&report.file).bold());
            println!("  Rows: {}", report.rows);
            for count in &report.counts {
                println!("  {:<12} {}", count.status.to_string(), count.rows);
            }
            if report.pending == 0 {
                println!("{}", style("Nothing left to process").green());
            } else {
                println!("{} rows left to process", report.pending);
            }
        }
    }

    Ok(())
}
