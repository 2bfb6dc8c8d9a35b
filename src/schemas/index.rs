//! Index schema - Summary listing of the vouchers in a workspace

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DisbursementVoucher, DvStatus};

/// One voucher in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexItem {
    pub id: String,
    pub dv_number: String,
    pub payee: String,
    pub amount: Decimal,
    pub status: DvStatus,
    pub cycle: u32,
    pub is_reallocated: bool,
}

impl From<&DisbursementVoucher> for IndexItem {
    fn from(voucher: &DisbursementVoucher) -> Self {
        IndexItem {
            id: voucher.id.clone(),
            dv_number: voucher.dv_number.clone(),
            payee: voucher.payee.clone(),
            amount: voucher.amount,
            status: voucher.status,
            cycle: voucher.cycle,
            is_reallocated: voucher.is_reallocated,
        }
    }
}

/// Index of all vouchers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    pub items: Vec<IndexItem>,

    /// When the index was generated
    pub generated_at: DateTime<Utc>,
}

impl Index {
    /// Create a new empty index
    pub fn new() -> Self {
        Index {
            schema_version: 1,
            items: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Build an index from loaded vouchers, keeping their order
    pub fn from_vouchers<'a>(vouchers: impl IntoIterator<Item = &'a DisbursementVoucher>) -> Self {
        let mut index = Index::new();
        index.items = vouchers.into_iter().map(IndexItem::from).collect();
        index
    }

    /// Number of vouchers per status, in status order
    pub fn count_by_status(&self) -> Vec<(DvStatus, usize)> {
        crate::domain::DV_STATUSES
            .iter()
            .map(|&status| {
                let count = self.items.iter().filter(|i| i.status == status).count();
                (status, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}
