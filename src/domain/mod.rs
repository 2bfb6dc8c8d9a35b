//! Domain logic for voucher states, transitions and the audit ledger

mod intake;
mod invariants;
mod ledger;
mod reallocation;
mod states;
mod transitions;
pub mod validation;


pub use intake::{
    add_ors_entry, open_voucher, ors_editable, remove_ors_entry, update_ors_entry, VoucherIntake,
};
pub use invariants::check_invariants;
pub use ledger::{history, AuditLedger, ChainBreak};
pub use reallocation::reallocate;
pub use states::{
    allowed_actions, current_stage, find_transition, is_detour_state, is_terminal_state,
    pipeline_rank, status_label, StageDescriptor, Target, Transition, DV_STATUSES, TRANSITIONS,
};
pub use transitions::{apply_action, apply_transition, TransitionContext, TransitionOutcome};
