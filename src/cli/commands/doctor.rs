//! Doctor command - Check stored vouchers for inconsistencies

use std::path::Path;

use crate::domain::check_invariants;
use crate::errors::{DvError, Result};
use crate::fs::list_vouchers;

use super::workspace_root;

/// Report vouchers whose snapshot violates a structural invariant
pub async fn run(cwd: Option<&Path>) -> Result<()> {
    let root = workspace_root(cwd)?;
    let vouchers = list_vouchers(&root)?;

    let mut broken = 0;
    for voucher in &vouchers {
        let problems = check_invariants(voucher);
        if problems.is_empty() {
            continue;
        }
        broken += 1;
        for problem in &problems {
            tracing::warn!(voucher = %voucher.id, "{}", problem);
            println!("{}: {}", voucher.id, problem);
        }
    }

    if broken > 0 {
        return Err(DvError::wrap(
            format!("{} of {} vouchers have problems", broken, vouchers.len()),
            "Doctor",
        ));
    }
    println!("{} vouchers checked, no problems found", vouchers.len());
    Ok(())
}
