//! History command - Print a voucher's audit ledger

use std::path::Path;

use crate::errors::Result;
use crate::fs::read_voucher;
use crate::schemas::AuditEntry;

use super::{print_json, workspace_root};

/// Print the ledger, optionally only entries whose label contains `label`
pub async fn run(cwd: Option<&Path>, id: &str, json: bool, label: Option<&str>) -> Result<()> {
    let root = workspace_root(cwd)?;
    let voucher = read_voucher(&root, id)?;

    let entries: Vec<&AuditEntry> = match label {
        Some(needle) => voucher.history.matching_label(needle),
        None => voucher.history.iter().collect(),
    };

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No history entries");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{:>3}  {}  c{}  {:<24} {} -> {}  [{}]",
            entry.sequence,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.cycle,
            entry.label,
            entry.status_before,
            entry.status_after,
            entry.actor
        );
        for (key, value) in &entry.payload {
            println!("       {} = {}", key, value);
        }
    }
    Ok(())
}
