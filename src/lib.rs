//! dvtrack - Disbursement voucher lifecycle tracking
//!
//! This library provides the core functionality for the dvtrack CLI, including:
//! - Schema definitions for vouchers, audit entries, ORS entries and config
//! - Domain logic for the voucher state machine, identifier grammars,
//!   the audit ledger and reallocation
//! - A JSON file-backed voucher store with optimistic version checks

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;

// Re-export commonly used types
pub use domain::{
    allowed_actions, apply_action, apply_transition, current_stage, history, open_voucher,
    reallocate, AuditLedger, StageDescriptor, TransitionContext, TransitionOutcome, VoucherIntake,
};
pub use errors::{CoreError, CoreResult, DvError, Result};
pub use schemas::{Action, ActionName, AuditEntry, Config, DisbursementVoucher, DvStatus};
