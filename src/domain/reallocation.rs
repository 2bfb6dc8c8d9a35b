//! Reallocation of processed vouchers
//!
//! A processed voucher rejected downstream re-enters the pipeline at cash
//! allocation. The stage data of the finished cycle is archived, cleared on the
//! live document, and the move is recorded through the normal transition path.
//! Intake fields, ORS entries, review-stage detours and the ledger are kept.

use crate::errors::{CoreError, CoreResult};
use crate::schemas::{Action, ArchivedCycle, DisbursementVoucher, DvStatus, Payload};

use super::transitions::{commit_transition, TransitionContext, TransitionOutcome};

/// Reopen a processed voucher at cash allocation.
///
/// The operation works on a copy, so the caller's snapshot is unchanged when
/// it fails.
///
/// # Errors
/// * `PreconditionFailed` - the voucher is not processed
pub fn reallocate(
    voucher: &DisbursementVoucher,
    reason: Option<&str>,
    ctx: &TransitionContext,
) -> CoreResult<TransitionOutcome> {
    if voucher.status != DvStatus::Processed {
        return Err(CoreError::PreconditionFailed(format!(
            "only processed vouchers can be reallocated; voucher {} is {}",
            voucher.id, voucher.status
        )));
    }

    let reason = reason.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string);
    let mut next = voucher.clone();

    let archived = ArchivedCycle {
        cycle: next.cycle,
        archived_at: ctx.now,
        reason: reason.clone(),
        fields: std::mem::take(&mut next.cycle_fields),
    };

    let mut payload = Payload::new();
    payload.insert("archived_cycle".to_string(), archived.cycle.to_string());
    if let Some(allocation) = &archived.fields.cash_allocation {
        payload.insert(
            "archived_allocation_number".to_string(),
            allocation.number.clone(),
        );
    }
    if let Some(reason) = &reason {
        payload.insert("reason".to_string(), reason.clone());
    }

    next.reallocation_history.push(archived);
    next.is_reallocated = true;
    next.cycle += 1;
    next.detour_origin = None;
    next.status = DvStatus::ForCashAllocation;

    tracing::info!(
        voucher = %next.id,
        cycle = next.cycle,
        reason = reason.as_deref().unwrap_or(""),
        "voucher reallocated"
    );

    Ok(commit_transition(
        next,
        DvStatus::Processed,
        &Action::Reallocate { reason },
        payload,
        ctx,
    ))
}
