//! Schema types for dvtrack
//!
//! Everything here round-trips through JSON; the snapshot file written by the
//! store is a serialized `DisbursementVoucher`.

mod action;
mod audit;
mod config;
mod index;
mod ors;
mod voucher;

pub use action::{Action, ActionName, ACTION_NAMES};
pub use audit::{AuditEntry, NewAuditEntry, Payload};
pub use config::Config;
pub use index::{Index, IndexItem};
pub use ors::OrsEntry;
pub use voucher::{
    ApprovalFields, ArchivedCycle, CashAllocation, CycleFields, DetourFields, DetourOrigin,
    DisbursementVoucher, DvStatus, EngasRecord, LddapCertification, NorsaRecord, PaymentMethod,
    PaymentSelection, RtsRecord,
};
