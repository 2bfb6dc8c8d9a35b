//! Voucher state graph
//!
//! The pipeline is fixed:
//! for_review → for_cash_allocation → for_box_c → for_approval → for_indexing
//! → for_payment_method → (out_for_cashiering | for_engas → for_cdj → for_lddap
//! → processed), with RTS/NORSA detours from review and box C, and
//! reallocation from processed back to cash allocation.

use serde::{Deserialize, Serialize};

use crate::schemas::{ActionName, DetourOrigin, DisbursementVoucher, DvStatus};

/// Every status, in pipeline order.
///
/// IMPORTANT: this is the source of truth for status ordering in listings.
pub const DV_STATUSES: &[DvStatus] = &[
    DvStatus::ForReview,
    DvStatus::ForRtsIn,
    DvStatus::ForNorsaIn,
    DvStatus::ForCashAllocation,
    DvStatus::ForBoxC,
    DvStatus::ForApproval,
    DvStatus::ForIndexing,
    DvStatus::ForPaymentMethod,
    DvStatus::ForEngas,
    DvStatus::ForCdj,
    DvStatus::ForLddap,
    DvStatus::OutForCashiering,
    DvStatus::Processed,
];

/// Where a transition leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A fixed status
    Status(DvStatus),
    /// Back to the stage the active detour left from
    DetourOrigin,
}

/// One edge of the state graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DvStatus,
    pub action: ActionName,
    pub to: Target,
}

const fn edge(from: DvStatus, action: ActionName, to: DvStatus) -> Transition {
    Transition {
        from,
        action,
        to: Target::Status(to),
    }
}

/// The complete transition table. Anything not listed is an invalid transition.
pub const TRANSITIONS: &[Transition] = &[
    edge(DvStatus::ForReview, ActionName::ReviewDone, DvStatus::ForCashAllocation),
    edge(DvStatus::ForReview, ActionName::RtsOut, DvStatus::ForRtsIn),
    edge(DvStatus::ForReview, ActionName::NorsaOut, DvStatus::ForNorsaIn),
    Transition {
        from: DvStatus::ForRtsIn,
        action: ActionName::RtsIn,
        to: Target::DetourOrigin,
    },
    Transition {
        from: DvStatus::ForNorsaIn,
        action: ActionName::NorsaIn,
        to: Target::DetourOrigin,
    },
    edge(DvStatus::ForCashAllocation, ActionName::Allocate, DvStatus::ForBoxC),
    edge(DvStatus::ForBoxC, ActionName::Certify, DvStatus::ForApproval),
    edge(DvStatus::ForBoxC, ActionName::RtsOut, DvStatus::ForRtsIn),
    edge(DvStatus::ForBoxC, ActionName::NorsaOut, DvStatus::ForNorsaIn),
    edge(DvStatus::ForApproval, ActionName::SendOut, DvStatus::ForApproval),
    edge(DvStatus::ForApproval, ActionName::ReturnIn, DvStatus::ForIndexing),
    edge(DvStatus::ForIndexing, ActionName::Index, DvStatus::ForPaymentMethod),
    edge(DvStatus::ForPaymentMethod, ActionName::SetMethod, DvStatus::ForPaymentMethod),
    edge(DvStatus::ForPaymentMethod, ActionName::OutToCashiering, DvStatus::OutForCashiering),
    edge(DvStatus::ForPaymentMethod, ActionName::SendForEngas, DvStatus::ForEngas),
    edge(DvStatus::ForEngas, ActionName::Record, DvStatus::ForCdj),
    edge(DvStatus::ForCdj, ActionName::Record, DvStatus::ForLddap),
    edge(DvStatus::ForLddap, ActionName::Certify, DvStatus::Processed),
    edge(DvStatus::Processed, ActionName::Reallocate, DvStatus::ForCashAllocation),
];

/// Look up the edge for an action from a status
pub fn find_transition(from: DvStatus, action: ActionName) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.action == action)
}

/// Actions that are legal from a status, in table order
pub fn allowed_actions(status: DvStatus) -> Vec<ActionName> {
    TRANSITIONS
        .iter()
        .filter(|t| t.from == status)
        .map(|t| t.action)
        .collect()
}

/// Resolve the status an action leads to for this voucher.
///
/// Returns None when the action is not legal from the voucher's status, or when
/// a detour return is requested without a recorded origin.
pub fn resolve_target(voucher: &DisbursementVoucher, action: ActionName) -> Option<DvStatus> {
    match find_transition(voucher.status, action)?.to {
        Target::Status(status) => Some(status),
        Target::DetourOrigin => voucher.detour_origin.map(DetourOrigin::status),
    }
}

/// Check if a status is terminal (processed)
pub fn is_terminal_state(status: DvStatus) -> bool {
    status == DvStatus::Processed
}

/// Check if a status is a detour waiting state
pub fn is_detour_state(status: DvStatus) -> bool {
    matches!(status, DvStatus::ForRtsIn | DvStatus::ForNorsaIn)
}

/// Position of a status along the main pipeline.
///
/// Detour states rank with the stage they left from. out_for_cashiering ranks
/// with for_engas: both follow payment-method selection on separate branches.
pub fn pipeline_rank(status: DvStatus, detour_origin: Option<DetourOrigin>) -> u8 {
    match status {
        DvStatus::ForReview => 0,
        DvStatus::ForRtsIn | DvStatus::ForNorsaIn => match detour_origin {
            Some(DetourOrigin::BoxC) => 2,
            _ => 0,
        },
        DvStatus::ForCashAllocation => 1,
        DvStatus::ForBoxC => 2,
        DvStatus::ForApproval => 3,
        DvStatus::ForIndexing => 4,
        DvStatus::ForPaymentMethod => 5,
        DvStatus::ForEngas | DvStatus::OutForCashiering => 6,
        DvStatus::ForCdj => 7,
        DvStatus::ForLddap => 8,
        DvStatus::Processed => 9,
    }
}

/// Human label for a status
pub fn status_label(status: DvStatus) -> &'static str {
    match status {
        DvStatus::ForReview => "For Review",
        DvStatus::ForRtsIn => "Returned to Sender",
        DvStatus::ForNorsaIn => "Awaiting NORSA",
        DvStatus::ForCashAllocation => "For Cash Allocation",
        DvStatus::ForBoxC => "For Box C Certification",
        DvStatus::ForApproval => "For Approval",
        DvStatus::ForIndexing => "For Indexing",
        DvStatus::ForPaymentMethod => "For Payment Method",
        DvStatus::ForEngas => "For E-NGAS Recording",
        DvStatus::ForCdj => "For CDJ Recording",
        DvStatus::ForLddap => "For LDDAP Certification",
        DvStatus::OutForCashiering => "Out for Cashiering",
        DvStatus::Processed => "Processed",
    }
}

/// What a front end needs to render the current stage of a voucher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub status: DvStatus,
    pub label: String,
    pub allowed_actions: Vec<ActionName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detour_origin: Option<DetourOrigin>,
    pub cycle: u32,
    pub is_terminal: bool,
    pub is_reallocated: bool,
}

/// Describe the stage a voucher is currently in
pub fn current_stage(voucher: &DisbursementVoucher) -> StageDescriptor {
    StageDescriptor {
        status: voucher.status,
        label: status_label(voucher.status).to_string(),
        allowed_actions: allowed_actions(voucher.status),
        detour_origin: voucher.detour_origin,
        cycle: voucher.cycle,
        is_terminal: is_terminal_state(voucher.status),
        is_reallocated: voucher.is_reallocated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tests::sample_voucher;

    #[test]
    fn test_statuses_order() {
        assert_eq!(DV_STATUSES.len(), 13);
        assert_eq!(DV_STATUSES[0], DvStatus::ForReview);
        assert_eq!(DV_STATUSES[12], DvStatus::Processed);
    }

    #[test]
    fn test_table_has_no_duplicate_edges() {
        for (i, a) in TRANSITIONS.iter().enumerate() {
            for b in &TRANSITIONS[i + 1..] {
                assert!(
                    !(a.from == b.from && a.action == b.action),
                    "duplicate edge {} --{}-->",
                    a.from,
                    a.action
                );
            }
        }
    }

    #[test]
    fn test_allowed_actions() {
        assert_eq!(
            allowed_actions(DvStatus::ForReview),
            vec![ActionName::ReviewDone, ActionName::RtsOut, ActionName::NorsaOut]
        );
        assert_eq!(
            allowed_actions(DvStatus::ForBoxC),
            vec![ActionName::Certify, ActionName::RtsOut, ActionName::NorsaOut]
        );
        assert_eq!(
            allowed_actions(DvStatus::ForPaymentMethod),
            vec![
                ActionName::SetMethod,
                ActionName::OutToCashiering,
                ActionName::SendForEngas
            ]
        );
        assert_eq!(allowed_actions(DvStatus::Processed), vec![ActionName::Reallocate]);
        assert!(allowed_actions(DvStatus::OutForCashiering).is_empty());
    }

    #[test]
    fn test_find_transition() {
        let t = find_transition(DvStatus::ForCashAllocation, ActionName::Allocate).unwrap();
        assert_eq!(t.to, Target::Status(DvStatus::ForBoxC));
        assert!(find_transition(DvStatus::ForReview, ActionName::Allocate).is_none());
        assert!(find_transition(DvStatus::ForCdj, ActionName::Certify).is_none());
    }

    #[test]
    fn test_resolve_target_detour_origin() {
        let mut voucher = sample_voucher();
        voucher.status = DvStatus::ForRtsIn;
        voucher.detour_origin = Some(DetourOrigin::BoxC);
        assert_eq!(resolve_target(&voucher, ActionName::RtsIn), Some(DvStatus::ForBoxC));

        voucher.detour_origin = Some(DetourOrigin::Review);
        assert_eq!(resolve_target(&voucher, ActionName::RtsIn), Some(DvStatus::ForReview));

        voucher.detour_origin = None;
        assert_eq!(resolve_target(&voucher, ActionName::RtsIn), None);
    }

    #[test]
    fn test_is_terminal_state() {
        for status in DV_STATUSES {
            assert_eq!(is_terminal_state(*status), *status == DvStatus::Processed);
        }
    }

    #[test]
    fn test_pipeline_rank_orders_main_path() {
        let main_path = [
            DvStatus::ForReview,
            DvStatus::ForCashAllocation,
            DvStatus::ForBoxC,
            DvStatus::ForApproval,
            DvStatus::ForIndexing,
            DvStatus::ForPaymentMethod,
            DvStatus::ForEngas,
            DvStatus::ForCdj,
            DvStatus::ForLddap,
            DvStatus::Processed,
        ];
        for pair in main_path.windows(2) {
            assert!(pipeline_rank(pair[0], None) < pipeline_rank(pair[1], None));
        }
        assert_eq!(
            pipeline_rank(DvStatus::ForNorsaIn, Some(DetourOrigin::BoxC)),
            pipeline_rank(DvStatus::ForBoxC, None)
        );
    }

    #[test]
    fn test_current_stage() {
        let voucher = sample_voucher();
        let stage = current_stage(&voucher);
        assert_eq!(stage.status, DvStatus::ForReview);
        assert_eq!(stage.label, "For Review");
        assert_eq!(stage.cycle, 1);
        assert!(!stage.is_terminal);
        assert!(stage.allowed_actions.contains(&ActionName::ReviewDone));
    }
}
