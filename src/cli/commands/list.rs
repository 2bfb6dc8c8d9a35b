//! List command - List vouchers with optional filtering

use std::path::Path;

use crate::domain::status_label;
use crate::errors::{DvError, Result};
use crate::fs::list_vouchers;
use crate::schemas::{DvStatus, Index};

use super::{print_json, workspace_root};

/// List vouchers, optionally only those in `status`
pub async fn run(cwd: Option<&Path>, json: bool, status: Option<&str>) -> Result<()> {
    let root = workspace_root(cwd)?;
    let status = status
        .map(|s| s.parse::<DvStatus>())
        .transpose()
        .map_err(|e| DvError::wrap(e, "Invalid status"))?;

    let vouchers = list_vouchers(&root)?;
    let index = Index::from_vouchers(
        vouchers
            .iter()
            .filter(|v| status.map_or(true, |s| v.status == s)),
    );

    if json {
        return print_json(&index);
    }
    if index.items.is_empty() {
        println!("No vouchers");
        return Ok(());
    }
    for item in &index.items {
        println!(
            "{:<10} {:<18} {:<24} {:>14}  {}{}",
            item.id,
            item.dv_number,
            item.payee,
            item.amount,
            status_label(item.status),
            if item.is_reallocated { " (reallocated)" } else { "" }
        );
    }
    println!();
    for (status, count) in index.count_by_status() {
        println!("{:<24} {}", status_label(status), count);
    }
    Ok(())
}
