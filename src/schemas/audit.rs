//! Audit entry schema - One recorded transition of a voucher

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActionName, DvStatus};

/// Field values an action set, keyed by field name
pub type Payload = BTreeMap<String, String>;

/// An immutable record of one accepted transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 1-based position in the voucher's ledger
    pub sequence: u64,

    pub timestamp: DateTime<Utc>,

    /// Who performed the action
    pub actor: String,

    pub action: ActionName,

    /// Human-readable action label, e.g. "Cash Allocation"
    pub label: String,

    pub status_before: DvStatus,

    pub status_after: DvStatus,

    /// Processing cycle the transition happened in
    pub cycle: u32,

    /// Fields the action set
    #[serde(default)]
    pub payload: Payload,
}

/// An entry before the ledger assigns its sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: ActionName,
    pub label: String,
    pub status_before: DvStatus,
    pub status_after: DvStatus,
    pub cycle: u32,
    pub payload: Payload,
}

impl AuditEntry {
    /// The status pair this entry records
    pub fn transition(&self) -> (DvStatus, DvStatus) {
        (self.status_before, self.status_after)
    }
}

impl From<&AuditEntry> for NewAuditEntry {
    fn from(entry: &AuditEntry) -> Self {
        NewAuditEntry {
            timestamp: entry.timestamp,
            actor: entry.actor.clone(),
            action: entry.action,
            label: entry.label.clone(),
            status_before: entry.status_before,
            status_after: entry.status_after,
            cycle: entry.cycle,
            payload: entry.payload.clone(),
        }
    }
}
