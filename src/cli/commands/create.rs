//! Create command - Register a newly received voucher

use std::path::Path;

use chrono::Utc;

use crate::domain::validation::parse_amount;
use crate::domain::{open_voucher, VoucherIntake};
use crate::errors::Result;
use crate::fs::{create_voucher, next_voucher_id};

use super::workspace_root;

/// Intake fields as given on the command line
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub dv_number: String,
    pub payee: String,
    pub transaction_type: String,
    pub implementing_unit: String,
    pub account_number: String,
    pub amount: String,
    pub particulars: String,
}

/// Open a voucher at for_review and store it
pub async fn run(cwd: Option<&Path>, args: CreateArgs) -> Result<()> {
    let root = workspace_root(cwd)?;
    let intake = VoucherIntake {
        dv_number: args.dv_number,
        payee: args.payee,
        transaction_type: args.transaction_type,
        implementing_unit: args.implementing_unit,
        account_number: args.account_number,
        amount: parse_amount("amount", &args.amount)?,
        particulars: args.particulars,
        ors_entries: Vec::new(),
    };

    let voucher = open_voucher(next_voucher_id(&root)?, intake, Utc::now())?;
    create_voucher(&root, &voucher)?;

    println!("Created {} ({}) for {}", voucher.id, voucher.dv_number, voucher.payee);
    Ok(())
}
