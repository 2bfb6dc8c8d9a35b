//! Reallocate command - Reopen a processed voucher at cash allocation

use std::path::Path;

use crate::config::{load_config, transition_context};
use crate::domain::reallocate;
use crate::errors::Result;
use crate::fs::{read_voucher, save_voucher};

use super::workspace_root;

/// Reallocate a processed voucher
pub async fn run(
    cwd: Option<&Path>,
    id: &str,
    reason: Option<&str>,
    actor: Option<&str>,
) -> Result<()> {
    let root = workspace_root(cwd)?;
    let config = load_config(&root)?;

    let voucher = read_voucher(&root, id)?;
    let ctx = transition_context(&config, actor);
    let outcome = reallocate(&voucher, reason, &ctx)?;
    save_voucher(&root, &outcome.voucher, voucher.version)?;

    println!(
        "{} reopened for cash allocation (cycle {}); cycle {} archived",
        id,
        outcome.voucher.cycle,
        voucher.cycle
    );
    Ok(())
}
