//! Show command - Show details of a specific voucher

use std::path::Path;

use crate::domain::current_stage;
use crate::errors::Result;
use crate::fs::read_voucher;
use crate::schemas::DisbursementVoucher;

use super::{print_json, workspace_root};

/// Show details of a specific voucher
pub async fn run(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let root = workspace_root(cwd)?;
    let voucher = read_voucher(&root, id)?;

    if json {
        return print_json(&voucher);
    }
    print_voucher(&voucher);
    Ok(())
}

fn print_voucher(voucher: &DisbursementVoucher) {
    let stage = current_stage(voucher);

    println!("{}  {}", voucher.id, voucher.dv_number);
    println!("  Payee:        {}", voucher.payee);
    println!("  Amount:       {}", voucher.amount);
    println!("  Type:         {}", voucher.transaction_type);
    println!("  Unit:         {}", voucher.implementing_unit);
    println!("  Account:      {}", voucher.account_number);
    println!("  Particulars:  {}", voucher.particulars);
    for (i, ors) in voucher.ors_entries.iter().enumerate() {
        println!("  ORS #{}:       {} / {} / {}", i + 1, ors.ors_number, ors.fund_source, ors.uacs);
    }

    println!();
    println!("  Status:       {} ({})", stage.label, stage.status);
    if let Some(origin) = stage.detour_origin {
        println!("  Detour from:  {}", origin);
    }
    println!("  Cycle:        {}{}", stage.cycle, if stage.is_reallocated { " (reallocated)" } else { "" });

    let fields = &voucher.cycle_fields;
    if let Some(allocation) = &fields.cash_allocation {
        println!(
            "  Allocation:   {} on {} (net {})",
            allocation.number, allocation.date, allocation.net_amount
        );
    }
    if let Some(approved_by) = &fields.approval.approved_by {
        println!("  Approved by:  {}", approved_by);
    }
    if let Some(payment) = &fields.payment {
        match &payment.lddap_ada_number {
            Some(number) => println!("  Method:       {} ({})", payment.method, number),
            None => println!("  Method:       {}", payment.method),
        }
    }
    if let Some(engas) = &fields.engas {
        println!("  E-NGAS:       {} on {}", engas.number, engas.date);
    }
    if let Some(lddap) = &fields.lddap {
        println!("  LDDAP:        {} on {}", lddap.number, lddap.certification_date);
    }

    if stage.allowed_actions.is_empty() {
        println!("  Next:         (none)");
    } else {
        let actions: Vec<String> = stage.allowed_actions.iter().map(|a| a.to_string()).collect();
        println!("  Next:         {}", actions.join(", "));
    }
}
