//! Append-only audit ledger
//!
//! The ledger is the record of what happened to a voucher and when. `append`
//! is its only mutator; entries are never edited or removed, reallocation
//! included.

use serde::{Deserialize, Serialize};

use crate::schemas::{ActionName, AuditEntry, DisbursementVoucher, DvStatus, NewAuditEntry};

/// Ordered transition history of one voucher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLedger {
    entries: Vec<AuditEntry>,
}

/// A break in the ledger's chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainBreak {
    /// Sequence numbers are not 1, 2, 3, ...
    SequenceGap { position: usize, found: u64 },
    /// An entry does not start where the previous one ended
    StatusMismatch {
        sequence: u64,
        expected: DvStatus,
        found: DvStatus,
    },
}

impl std::fmt::Display for ChainBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainBreak::SequenceGap { position, found } => write!(
                f,
                "entry at position {} has sequence {} (expected {})",
                position,
                found,
                position + 1
            ),
            ChainBreak::StatusMismatch {
                sequence,
                expected,
                found,
            } => write!(
                f,
                "entry {} starts from {} but the previous entry ended at {}",
                sequence, found, expected
            ),
        }
    }
}

impl AuditLedger {
    pub fn new() -> Self {
        AuditLedger::default()
    }

    /// Append an entry, assigning the next sequence number.
    ///
    /// Returns the stored entry.
    pub fn append(&mut self, entry: NewAuditEntry) -> &AuditEntry {
        let sequence = self.entries.len() as u64 + 1;
        debug_assert!(
            self.last()
                .map_or(true, |prev| prev.status_after == entry.status_before),
            "ledger entry {} does not continue from the previous status",
            sequence
        );
        self.entries.push(AuditEntry {
            sequence,
            timestamp: entry.timestamp,
            actor: entry.actor,
            action: entry.action,
            label: entry.label,
            status_before: entry.status_before,
            status_after: entry.status_after,
            cycle: entry.cycle,
            payload: entry.payload,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// Entries recorded for an action name
    pub fn by_action(&self, action: ActionName) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.action == action).collect()
    }

    /// Entries whose label contains `needle`, case-insensitively (e.g. "RTS")
    pub fn matching_label(&self, needle: &str) -> Vec<&AuditEntry> {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Entries recorded during one processing cycle
    pub fn for_cycle(&self, cycle: u32) -> Vec<&AuditEntry> {
        self.entries.iter().filter(|e| e.cycle == cycle).collect()
    }

    /// RTS and NORSA detour entries, out and in
    pub fn detours(&self) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.action,
                    ActionName::RtsOut | ActionName::RtsIn | ActionName::NorsaOut | ActionName::NorsaIn
                )
            })
            .collect()
    }

    /// The (before, after) status pairs in order
    pub fn transition_path(&self) -> Vec<(DvStatus, DvStatus)> {
        self.entries.iter().map(AuditEntry::transition).collect()
    }

    /// Check sequence numbering and status continuity
    pub fn verify_chain(&self) -> Result<(), ChainBreak> {
        let mut previous: Option<&AuditEntry> = None;
        for (position, entry) in self.entries.iter().enumerate() {
            if entry.sequence != position as u64 + 1 {
                return Err(ChainBreak::SequenceGap {
                    position,
                    found: entry.sequence,
                });
            }
            if let Some(prev) = previous {
                if prev.status_after != entry.status_before {
                    return Err(ChainBreak::StatusMismatch {
                        sequence: entry.sequence,
                        expected: prev.status_after,
                        found: entry.status_before,
                    });
                }
            }
            previous = Some(entry);
        }
        Ok(())
    }

    /// Rebuild a ledger by appending `entries` in order to an empty one
    pub fn replay<'a>(entries: impl IntoIterator<Item = &'a AuditEntry>) -> Self {
        let mut ledger = AuditLedger::new();
        for entry in entries {
            ledger.append(NewAuditEntry::from(entry));
        }
        ledger
    }
}

/// Full ordered transition history of a voucher
pub fn history(voucher: &DisbursementVoucher) -> &[AuditEntry] {
    voucher.history.entries()
}
