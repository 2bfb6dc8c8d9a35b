//! Apply command - Move a voucher through one pipeline step

use std::path::Path;

use crate::config::{load_config, transition_context};
use crate::domain::{apply_action, status_label};
use crate::errors::{DvError, Result};
use crate::fs::{read_voucher, save_voucher};
use crate::schemas::ActionName;

use super::{parse_fields, print_json, workspace_root};

/// Apply a named action with `key=value` fields
pub async fn run(
    cwd: Option<&Path>,
    id: &str,
    action: &str,
    fields: &[String],
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let root = workspace_root(cwd)?;
    let config = load_config(&root)?;
    let name: ActionName = action.parse().map_err(|e| DvError::wrap(e, "Invalid action"))?;
    let payload = parse_fields(fields)?;

    let voucher = read_voucher(&root, id)?;
    let ctx = transition_context(&config, actor);
    let outcome = apply_action(&voucher, name, &payload, &ctx)?;
    save_voucher(&root, &outcome.voucher, voucher.version)?;

    if json {
        return print_json(&outcome.entry);
    }
    println!(
        "{}: {} -> {} ({})",
        id,
        outcome.entry.status_before,
        outcome.entry.status_after,
        outcome.entry.label
    );
    println!("Now: {}", status_label(outcome.voucher.status));
    Ok(())
}
