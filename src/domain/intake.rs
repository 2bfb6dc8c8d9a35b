//! Voucher intake and ORS entry maintenance

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};
use crate::schemas::{
    CycleFields, DetourFields, DetourOrigin, DisbursementVoucher, DvStatus, OrsEntry,
};

use super::ledger::AuditLedger;
use super::validation::{validate_non_empty, validate_positive_amount};

/// Fields captured when a voucher is received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherIntake {
    pub dv_number: String,
    pub payee: String,
    pub transaction_type: String,
    pub implementing_unit: String,
    pub account_number: String,
    pub amount: Decimal,
    pub particulars: String,
    #[serde(default)]
    pub ors_entries: Vec<OrsEntry>,
}

/// Create a voucher in `for_review` from its intake fields.
///
/// # Errors
/// * `MissingField` - a text field is blank
/// * `FormatError` - the amount is not greater than zero
pub fn open_voucher(
    id: impl Into<String>,
    intake: VoucherIntake,
    now: DateTime<Utc>,
) -> CoreResult<DisbursementVoucher> {
    let id = validate_non_empty("id", &id.into())?;
    let ors_entries = intake
        .ors_entries
        .iter()
        .map(validate_ors_entry)
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(DisbursementVoucher {
        schema_version: 1,
        id,
        dv_number: validate_non_empty("dv_number", &intake.dv_number)?,
        payee: validate_non_empty("payee", &intake.payee)?,
        transaction_type: validate_non_empty("transaction_type", &intake.transaction_type)?,
        implementing_unit: validate_non_empty("implementing_unit", &intake.implementing_unit)?,
        account_number: validate_non_empty("account_number", &intake.account_number)?,
        amount: validate_positive_amount("amount", intake.amount)?,
        particulars: validate_non_empty("particulars", &intake.particulars)?,
        ors_entries,
        status: DvStatus::ForReview,
        detour_origin: None,
        review_detour: DetourFields::default(),
        cycle_fields: CycleFields::default(),
        is_reallocated: false,
        cycle: 1,
        reallocation_history: Vec::new(),
        history: AuditLedger::new(),
        version: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Whether ORS entries may still be edited.
///
/// Editing is open while the voucher is in intake review, including detours
/// taken from review, and closes once cash has been allocated.
pub fn ors_editable(voucher: &DisbursementVoucher) -> bool {
    let in_intake = match voucher.status {
        DvStatus::ForReview => true,
        DvStatus::ForRtsIn | DvStatus::ForNorsaIn => {
            voucher.detour_origin == Some(DetourOrigin::Review)
        }
        _ => false,
    };
    in_intake && voucher.cycle == 1 && voucher.cycle_fields.cash_allocation.is_none()
}

/// Return a copy of the voucher with an ORS entry appended
pub fn add_ors_entry(voucher: &DisbursementVoucher, entry: OrsEntry) -> CoreResult<DisbursementVoucher> {
    ensure_ors_editable(voucher)?;
    let entry = validate_ors_entry(&entry)?;
    let mut next = voucher.clone();
    next.ors_entries.push(entry);
    Ok(touch(next))
}

/// Return a copy of the voucher with the ORS entry at `index` replaced
pub fn update_ors_entry(
    voucher: &DisbursementVoucher,
    index: usize,
    entry: OrsEntry,
) -> CoreResult<DisbursementVoucher> {
    ensure_ors_editable(voucher)?;
    let entry = validate_ors_entry(&entry)?;
    ensure_ors_index(voucher, index)?;
    let mut next = voucher.clone();
    next.ors_entries[index] = entry;
    Ok(touch(next))
}

/// Return a copy of the voucher without the ORS entry at `index`
pub fn remove_ors_entry(voucher: &DisbursementVoucher, index: usize) -> CoreResult<DisbursementVoucher> {
    ensure_ors_editable(voucher)?;
    ensure_ors_index(voucher, index)?;
    let mut next = voucher.clone();
    next.ors_entries.remove(index);
    Ok(touch(next))
}

/// ORS edits are not ledger entries but still count as a new revision
fn touch(mut next: DisbursementVoucher) -> DisbursementVoucher {
    next.version += 1;
    next.updated_at = Utc::now();
    next
}

fn ensure_ors_editable(voucher: &DisbursementVoucher) -> CoreResult<()> {
    if !ors_editable(voucher) {
        return Err(CoreError::PreconditionFailed(format!(
            "ORS entries of voucher {} can no longer be edited (status {})",
            voucher.id, voucher.status
        )));
    }
    Ok(())
}

fn ensure_ors_index(voucher: &DisbursementVoucher, index: usize) -> CoreResult<()> {
    if index >= voucher.ors_entries.len() {
        return Err(CoreError::PreconditionFailed(format!(
            "voucher {} has no ORS entry #{}",
            voucher.id,
            index + 1
        )));
    }
    Ok(())
}

fn validate_ors_entry(entry: &OrsEntry) -> CoreResult<OrsEntry> {
    Ok(OrsEntry {
        ors_number: validate_non_empty("ors_number", &entry.ors_number)?,
        fund_source: validate_non_empty("fund_source", &entry.fund_source)?,
        uacs: validate_non_empty("uacs", &entry.uacs)?,
    })
}
