//! Structural consistency checks for a voucher snapshot
//!
//! Used by `doctor`, and by the property tests after every random walk.

use crate::schemas::{DetourOrigin, DisbursementVoucher, DvStatus};

use super::states::{is_detour_state, pipeline_rank};

/// Pipeline rank of the stages whose transitions write each field
const CASH_ALLOCATION_RANK: u8 = 1;
const BOX_C_RANK: u8 = 2;
const APPROVAL_RANK: u8 = 3;
const INDEXING_RANK: u8 = 4;
const PAYMENT_METHOD_RANK: u8 = 5;
const ENGAS_RANK: u8 = 6;
const CDJ_RANK: u8 = 7;
const LDDAP_RANK: u8 = 8;

/// Return every invariant the voucher violates. Empty means consistent.
pub fn check_invariants(voucher: &DisbursementVoucher) -> Vec<String> {
    let mut problems = Vec::new();
    let rank = pipeline_rank(voucher.status, voucher.detour_origin);
    let fields = &voucher.cycle_fields;

    // Fields written when leaving a stage exist only past that stage;
    // self-loop fields (send_out, set_method) and box C detours exist from the stage on.
    let mut future = |present: bool, name: &str, past: bool| {
        if present && !past {
            problems.push(format!("{} is set before its stage (status {})", name, voucher.status));
        }
    };
    future(fields.cash_allocation.is_some(), "cash allocation", rank > CASH_ALLOCATION_RANK);
    future(!fields.box_c_detour.is_empty(), "box C detour", rank >= BOX_C_RANK);
    future(fields.approval.out_date.is_some(), "approval out date", rank >= APPROVAL_RANK);
    future(
        fields.approval.in_date.is_some() || fields.approval.approved_by.is_some(),
        "approval return",
        rank > APPROVAL_RANK,
    );
    future(fields.indexing_date.is_some(), "indexing date", rank > INDEXING_RANK);
    future(fields.payment.is_some(), "payment method", rank >= PAYMENT_METHOD_RANK);
    future(fields.engas.is_some(), "E-NGAS record", rank > ENGAS_RANK);
    future(fields.cdj_date.is_some(), "CDJ date", rank > CDJ_RANK);
    future(fields.lddap.is_some(), "LDDAP certification", rank > LDDAP_RANK);

    if voucher.status == DvStatus::OutForCashiering && fields.engas.is_some() {
        problems.push("out_for_cashiering voucher carries an E-NGAS record".to_string());
    }

    match (is_detour_state(voucher.status), voucher.detour_origin) {
        (true, None) => problems.push(format!("{} has no detour origin", voucher.status)),
        (false, Some(origin)) => problems.push(format!(
            "detour origin {} recorded outside a detour (status {})",
            origin, voucher.status
        )),
        (true, Some(DetourOrigin::BoxC)) if fields.cash_allocation.is_none() => {
            problems.push("box C detour without a cash allocation".to_string())
        }
        _ => {}
    }

    let expected_cycle = voucher.reallocation_history.len() as u32 + 1;
    if voucher.cycle != expected_cycle {
        problems.push(format!(
            "cycle is {} but {} cycle(s) are archived",
            voucher.cycle,
            voucher.reallocation_history.len()
        ));
    }
    if voucher.is_reallocated && voucher.cycle < 2 {
        problems.push("flagged as reallocated in its first cycle".to_string());
    }
    if voucher.is_reallocated && voucher.status == DvStatus::Processed {
        problems.push("processed voucher still flagged as reallocated".to_string());
    }

    if let Err(brk) = voucher.history.verify_chain() {
        problems.push(format!("audit ledger broken: {}", brk));
    }
    match voucher.history.last() {
        Some(last) if last.status_after != voucher.status => problems.push(format!(
            "last ledger entry ends at {} but the voucher is {}",
            last.status_after, voucher.status
        )),
        None if voucher.status != DvStatus::ForReview => problems.push(format!(
            "voucher is {} with an empty ledger",
            voucher.status
        )),
        _ => {}
    }
    if voucher.version < voucher.history.len() as u64 {
        problems.push(format!(
            "version {} is behind the ledger ({} entries)",
            voucher.version,
            voucher.history.len()
        ));
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tests::{drive, processed_voucher, sample_voucher, TO_LDDAP};
    use crate::domain::reallocation::reallocate;
    use crate::domain::transitions::TransitionContext;
    use crate::schemas::{ActionName, EngasRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_fresh_and_processed_vouchers_are_consistent() {
        assert!(check_invariants(&sample_voucher()).is_empty());
        assert!(check_invariants(&drive(sample_voucher(), TO_LDDAP)).is_empty());
        assert!(check_invariants(&processed_voucher()).is_empty());
    }

    #[test]
    fn test_reallocated_voucher_is_consistent() {
        let next = reallocate(&processed_voucher(), None, &TransitionContext::new("tester"))
            .unwrap()
            .voucher;
        assert_eq!(check_invariants(&next), Vec::<String>::new());
    }

    #[test]
    fn test_box_c_detour_is_consistent() {
        let voucher = drive(
            sample_voucher(),
            &[
                (ActionName::ReviewDone, &[]),
                (
                    ActionName::Allocate,
                    &[
                        ("allocation_date", "2025-06-02"),
                        ("allocation_number", "2025-06-04734"),
                        ("net_amount", "14250.00"),
                    ],
                ),
                (ActionName::NorsaOut, &[("norsa_number", "2025-06-0012"), ("norsa_date", "2025-06-03")]),
            ],
        );
        assert_eq!(voucher.status, DvStatus::ForNorsaIn);
        assert!(check_invariants(&voucher).is_empty());
    }

    #[test]
    fn test_detects_future_stage_field() {
        let mut voucher = sample_voucher();
        voucher.cycle_fields.engas = Some(EngasRecord {
            number: "2025-07-000457".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        });
        let problems = check_invariants(&voucher);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("E-NGAS"));
    }

    #[test]
    fn test_detects_orphan_detour_origin() {
        let mut voucher = sample_voucher();
        voucher.detour_origin = Some(DetourOrigin::Review);
        assert_eq!(check_invariants(&voucher).len(), 1);
    }

    #[test]
    fn test_detects_status_not_matching_ledger() {
        let mut voucher = drive(sample_voucher(), &[(ActionName::ReviewDone, &[])]);
        voucher.status = DvStatus::ForBoxC;
        let problems = check_invariants(&voucher);
        assert!(problems.iter().any(|p| p.contains("last ledger entry")));
    }
}
