//! Voucher schema - The disbursement voucher aggregate and its stage fields

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::AuditLedger;

use super::OrsEntry;

/// Pipeline status of a voucher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DvStatus {
    /// Intake review
    ForReview,
    /// Returned to sender, waiting for the document to come back
    ForRtsIn,
    /// NORSA filed, waiting for the corrected document
    ForNorsaIn,
    /// Waiting for cash allocation
    ForCashAllocation,
    /// Waiting for box C certification
    ForBoxC,
    /// Out for (or waiting on) approval
    ForApproval,
    /// Waiting for indexing
    ForIndexing,
    /// Waiting for payment method selection
    ForPaymentMethod,
    /// Waiting for E-NGAS recording
    ForEngas,
    /// Waiting for CDJ recording
    ForCdj,
    /// Waiting for LDDAP certification
    ForLddap,
    /// Released to the cashier
    OutForCashiering,
    /// Fully processed (terminal)
    Processed,
}

impl std::fmt::Display for DvStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DvStatus::ForReview => write!(f, "for_review"),
            DvStatus::ForRtsIn => write!(f, "for_rts_in"),
            DvStatus::ForNorsaIn => write!(f, "for_norsa_in"),
            DvStatus::ForCashAllocation => write!(f, "for_cash_allocation"),
            DvStatus::ForBoxC => write!(f, "for_box_c"),
            DvStatus::ForApproval => write!(f, "for_approval"),
            DvStatus::ForIndexing => write!(f, "for_indexing"),
            DvStatus::ForPaymentMethod => write!(f, "for_payment_method"),
            DvStatus::ForEngas => write!(f, "for_engas"),
            DvStatus::ForCdj => write!(f, "for_cdj"),
            DvStatus::ForLddap => write!(f, "for_lddap"),
            DvStatus::OutForCashiering => write!(f, "out_for_cashiering"),
            DvStatus::Processed => write!(f, "processed"),
        }
    }
}

impl std::str::FromStr for DvStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for_review" => Ok(DvStatus::ForReview),
            "for_rts_in" => Ok(DvStatus::ForRtsIn),
            "for_norsa_in" => Ok(DvStatus::ForNorsaIn),
            "for_cash_allocation" => Ok(DvStatus::ForCashAllocation),
            "for_box_c" => Ok(DvStatus::ForBoxC),
            "for_approval" => Ok(DvStatus::ForApproval),
            "for_indexing" => Ok(DvStatus::ForIndexing),
            "for_payment_method" => Ok(DvStatus::ForPaymentMethod),
            "for_engas" => Ok(DvStatus::ForEngas),
            "for_cdj" => Ok(DvStatus::ForCdj),
            "for_lddap" => Ok(DvStatus::ForLddap),
            "out_for_cashiering" => Ok(DvStatus::OutForCashiering),
            "processed" => Ok(DvStatus::Processed),
            _ => Err(format!("Unknown voucher status: {}", s)),
        }
    }
}

/// Stage a return-to-sender or NORSA detour left from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetourOrigin {
    Review,
    BoxC,
}

impl DetourOrigin {
    /// The status a detour from this origin returns to
    pub fn status(self) -> DvStatus {
        match self {
            DetourOrigin::Review => DvStatus::ForReview,
            DetourOrigin::BoxC => DvStatus::ForBoxC,
        }
    }

    /// The origin tag for a status, if detours may leave from it
    pub fn from_status(status: DvStatus) -> Option<Self> {
        match status {
            DvStatus::ForReview => Some(DetourOrigin::Review),
            DvStatus::ForBoxC => Some(DetourOrigin::BoxC),
            _ => None,
        }
    }
}

impl std::fmt::Display for DetourOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetourOrigin::Review => write!(f, "review"),
            DetourOrigin::BoxC => write!(f, "box_c"),
        }
    }
}

/// Payment method chosen at the payment-method stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Check,
    Lddap,
    Payroll,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Check => write!(f, "check"),
            PaymentMethod::Lddap => write!(f, "lddap"),
            PaymentMethod::Payroll => write!(f, "payroll"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(PaymentMethod::Check),
            "lddap" => Ok(PaymentMethod::Lddap),
            "payroll" => Ok(PaymentMethod::Payroll),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

/// A return-to-sender detour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtsRecord {
    pub out_date: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub in_date: Option<NaiveDate>,
}

/// A NORSA detour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NorsaRecord {
    pub number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub in_date: Option<NaiveDate>,
}

/// Latest RTS and NORSA detour taken from one stage of origin.
///
/// A repeated detour replaces the record; earlier ones remain in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetourFields {
    #[serde(default)]
    pub rts: Option<RtsRecord>,
    #[serde(default)]
    pub norsa: Option<NorsaRecord>,
}

impl DetourFields {
    pub fn is_empty(&self) -> bool {
        self.rts.is_none() && self.norsa.is_none()
    }
}

/// Cash allocation stage data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAllocation {
    pub date: NaiveDate,
    pub number: String,
    pub net_amount: Decimal,
}

/// Approval stage data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalFields {
    #[serde(default)]
    pub out_date: Option<NaiveDate>,
    #[serde(default)]
    pub in_date: Option<NaiveDate>,
    #[serde(default)]
    pub approved_by: Option<String>,
}

impl ApprovalFields {
    pub fn is_empty(&self) -> bool {
        self.out_date.is_none() && self.in_date.is_none() && self.approved_by.is_none()
    }
}

/// Payment method selection, with the LDDAP-ADA number when paying by LDDAP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lddap_ada_number: Option<String>,
}

/// E-NGAS recording data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngasRecord {
    pub number: String,
    pub date: NaiveDate,
}

/// LDDAP certification data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LddapCertification {
    pub number: String,
    pub certification_date: NaiveDate,
}

/// Every field set at or after cash allocation.
///
/// This is the unit reallocation archives and clears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleFields {
    #[serde(default)]
    pub cash_allocation: Option<CashAllocation>,
    #[serde(default)]
    pub box_c_detour: DetourFields,
    #[serde(default)]
    pub approval: ApprovalFields,
    #[serde(default)]
    pub indexing_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment: Option<PaymentSelection>,
    #[serde(default)]
    pub engas: Option<EngasRecord>,
    #[serde(default)]
    pub cdj_date: Option<NaiveDate>,
    #[serde(default)]
    pub lddap: Option<LddapCertification>,
}

impl CycleFields {
    pub fn is_empty(&self) -> bool {
        *self == CycleFields::default()
    }
}

/// A completed cycle's stage data, archived by reallocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedCycle {
    /// Cycle number the fields belonged to (1 for the original pass)
    pub cycle: u32,

    pub archived_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub fields: CycleFields,
}

/// A disbursement voucher tracked through the processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisbursementVoucher {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    /// Unique identifier for the voucher
    pub id: String,

    /// Office-assigned DV number
    pub dv_number: String,

    // Intake fields, never cleared
    pub payee: String,
    pub transaction_type: String,
    pub implementing_unit: String,
    pub account_number: String,
    pub amount: Decimal,
    pub particulars: String,

    #[serde(default)]
    pub ors_entries: Vec<OrsEntry>,

    /// Current pipeline status
    pub status: DvStatus,

    /// Where the active detour left from (set only in for_rts_in / for_norsa_in)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detour_origin: Option<DetourOrigin>,

    /// Detours taken during intake review
    #[serde(default)]
    pub review_detour: DetourFields,

    /// Stage data of the current cycle
    #[serde(default)]
    pub cycle_fields: CycleFields,

    /// True from reallocation until the document is processed again
    #[serde(default)]
    pub is_reallocated: bool,

    /// Current processing cycle, starting at 1
    pub cycle: u32,

    /// Archived stage data of earlier cycles, oldest first
    #[serde(default)]
    pub reallocation_history: Vec<ArchivedCycle>,

    /// Transition audit trail
    #[serde(default)]
    pub history: AuditLedger,

    /// Incremented by every accepted transition
    pub version: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DisbursementVoucher {
    pub fn cash_allocation_number(&self) -> Option<&str> {
        self.cycle_fields
            .cash_allocation
            .as_ref()
            .map(|a| a.number.as_str())
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.cycle_fields.payment.as_ref().map(|p| p.method)
    }

    /// Detour record group for an origin
    pub fn detour_fields(&self, origin: DetourOrigin) -> &DetourFields {
        match origin {
            DetourOrigin::Review => &self.review_detour,
            DetourOrigin::BoxC => &self.cycle_fields.box_c_detour,
        }
    }

    pub(crate) fn detour_fields_mut(&mut self, origin: DetourOrigin) -> &mut DetourFields {
        match origin {
            DetourOrigin::Review => &mut self.review_detour,
            DetourOrigin::BoxC => &mut self.cycle_fields.box_c_detour,
        }
    }
}
