use anyhow::{Context, Result};
use repricer_core::inventory::{InventoryTable, RowStatus};
use std::path::Path;

/// Clear row statuses so the next run picks those rows up again.
///
/// With an empty `only`, every row that has a status is cleared.
pub fn reset_statuses(file: &Path, only: &[RowStatus]) -> Result<(usize, Option<std::path::PathBuf>)> {
    let mut table = InventoryTable::load(file)
        .with_context(|| format!("Could not open inventory {}", file.display()))?;

    let changed = table
        .reset(|status| only.is_empty() || only.contains(&status))
        .with_context(|| format!("Failed to rewrite {}", file.display()))?;

    Ok((changed, table.backup_path().map(Path::to_path_buf)))
}

pub fn execute(file: &Path, only: &[RowStatus]) -> Result<()> {
    if only.is_empty() {
        tracing::info!("Clearing all statuses in {}", file.display());
    } else {
        let names: Vec<String> = only.iter().map(|s| s.to_string()).collect();
        tracing::info!("Clearing {} statuses in {}", names.join(", "), file.display());
    }

    let (changed, backup) = reset_statuses(file, only)?;

    if changed == 0 {
        println!("No rows to reset");
    } else {
        println!("Reset {} rows", changed);
        if let Some(backup) = backup {
            println!("Backup: {}", backup.display());
        }
    }

    Ok(())
}
