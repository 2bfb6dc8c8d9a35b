//! Action schema - Named actions and their typed payloads

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{parse_amount, parse_date};
use crate::errors::{CoreError, CoreResult};

use super::{DvStatus, Payload, PaymentMethod};

/// Action names accepted by the voucher core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    ReviewDone,
    RtsOut,
    RtsIn,
    NorsaOut,
    NorsaIn,
    Allocate,
    Certify,
    SendOut,
    ReturnIn,
    Index,
    SetMethod,
    OutToCashiering,
    SendForEngas,
    Record,
    Reallocate,
}

/// Every action name, in pipeline order
pub const ACTION_NAMES: &[ActionName] = &[
    ActionName::ReviewDone,
    ActionName::RtsOut,
    ActionName::RtsIn,
    ActionName::NorsaOut,
    ActionName::NorsaIn,
    ActionName::Allocate,
    ActionName::Certify,
    ActionName::SendOut,
    ActionName::ReturnIn,
    ActionName::Index,
    ActionName::SetMethod,
    ActionName::OutToCashiering,
    ActionName::SendForEngas,
    ActionName::Record,
    ActionName::Reallocate,
];

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionName::ReviewDone => "review_done",
            ActionName::RtsOut => "rts_out",
            ActionName::RtsIn => "rts_in",
            ActionName::NorsaOut => "norsa_out",
            ActionName::NorsaIn => "norsa_in",
            ActionName::Allocate => "allocate",
            ActionName::Certify => "certify",
            ActionName::SendOut => "send_out",
            ActionName::ReturnIn => "return_in",
            ActionName::Index => "index",
            ActionName::SetMethod => "set_method",
            ActionName::OutToCashiering => "out_to_cashiering",
            ActionName::SendForEngas => "send_for_engas",
            ActionName::Record => "record",
            ActionName::Reallocate => "reallocate",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ActionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_NAMES
            .iter()
            .copied()
            .find(|name| name.to_string() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// An action with its strongly-typed payload.
///
/// `certify` and `record` mean different things at different stages, so each
/// use gets its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ReviewDone,
    RtsOut {
        rts_out_date: NaiveDate,
        rts_reason: String,
    },
    RtsIn {
        rts_in_date: NaiveDate,
    },
    NorsaOut {
        norsa_number: String,
        norsa_date: NaiveDate,
    },
    NorsaIn {
        norsa_in_date: NaiveDate,
    },
    Allocate {
        allocation_date: NaiveDate,
        allocation_number: String,
        net_amount: Decimal,
    },
    CertifyBoxC,
    SendOut {
        approval_out_date: NaiveDate,
    },
    ReturnIn {
        approval_in_date: NaiveDate,
        approved_by: String,
    },
    Index {
        indexing_date: NaiveDate,
    },
    SetMethod {
        method: PaymentMethod,
        #[serde(default)]
        lddap_number: Option<String>,
    },
    OutToCashiering,
    SendForEngas,
    RecordEngas {
        engas_number: String,
        engas_date: NaiveDate,
    },
    RecordCdj {
        cdj_date: NaiveDate,
    },
    CertifyLddap {
        lddap_number: String,
        certification_date: NaiveDate,
    },
    Reallocate {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl Action {
    /// The wire name of this action
    pub fn name(&self) -> ActionName {
        match self {
            Action::ReviewDone => ActionName::ReviewDone,
            Action::RtsOut { .. } => ActionName::RtsOut,
            Action::RtsIn { .. } => ActionName::RtsIn,
            Action::NorsaOut { .. } => ActionName::NorsaOut,
            Action::NorsaIn { .. } => ActionName::NorsaIn,
            Action::Allocate { .. } => ActionName::Allocate,
            Action::CertifyBoxC | Action::CertifyLddap { .. } => ActionName::Certify,
            Action::SendOut { .. } => ActionName::SendOut,
            Action::ReturnIn { .. } => ActionName::ReturnIn,
            Action::Index { .. } => ActionName::Index,
            Action::SetMethod { .. } => ActionName::SetMethod,
            Action::OutToCashiering => ActionName::OutToCashiering,
            Action::SendForEngas => ActionName::SendForEngas,
            Action::RecordEngas { .. } | Action::RecordCdj { .. } => ActionName::Record,
            Action::Reallocate { .. } => ActionName::Reallocate,
        }
    }

    /// Human label recorded in the audit ledger
    pub fn label(&self) -> &'static str {
        match self {
            Action::ReviewDone => "Review Completed",
            Action::RtsOut { .. } => "RTS Out",
            Action::RtsIn { .. } => "RTS In",
            Action::NorsaOut { .. } => "NORSA Out",
            Action::NorsaIn { .. } => "NORSA In",
            Action::Allocate { .. } => "Cash Allocation",
            Action::CertifyBoxC => "Box C Certification",
            Action::SendOut { .. } => "Sent Out for Approval",
            Action::ReturnIn { .. } => "Returned from Approval",
            Action::Index { .. } => "Indexing",
            Action::SetMethod { .. } => "Payment Method Selected",
            Action::OutToCashiering => "Out to Cashiering",
            Action::SendForEngas => "Sent for E-NGAS",
            Action::RecordEngas { .. } => "E-NGAS Recorded",
            Action::RecordCdj { .. } => "CDJ Recorded",
            Action::CertifyLddap { .. } => "LDDAP Certification",
            Action::Reallocate { .. } => "Reallocation",
        }
    }

    /// Build a typed action from a loose field map.
    ///
    /// `status` picks the meaning of `certify` and `record`. Only presence and
    /// value types are checked here; identifier grammars are checked when the
    /// action is applied.
    ///
    /// # Errors
    /// * `InvalidTransition` - `certify`/`record` from a status without that stage
    /// * `MissingField` - a required field is absent or blank
    /// * `FormatError` - a date, amount or method does not parse
    pub fn from_payload(name: ActionName, status: DvStatus, payload: &Payload) -> CoreResult<Self> {
        let action = match name {
            ActionName::ReviewDone => Action::ReviewDone,
            ActionName::RtsOut => Action::RtsOut {
                rts_out_date: required_date(payload, "rts_out_date")?,
                rts_reason: required_str(payload, "rts_reason")?,
            },
            ActionName::RtsIn => Action::RtsIn {
                rts_in_date: required_date(payload, "rts_in_date")?,
            },
            ActionName::NorsaOut => Action::NorsaOut {
                norsa_number: required_str(payload, "norsa_number")?,
                norsa_date: required_date(payload, "norsa_date")?,
            },
            ActionName::NorsaIn => Action::NorsaIn {
                norsa_in_date: required_date(payload, "norsa_in_date")?,
            },
            ActionName::Allocate => Action::Allocate {
                allocation_date: required_date(payload, "allocation_date")?,
                allocation_number: required_str(payload, "allocation_number")?,
                net_amount: parse_amount("net_amount", &required_str(payload, "net_amount")?)?,
            },
            ActionName::Certify => match status {
                DvStatus::ForBoxC => Action::CertifyBoxC,
                DvStatus::ForLddap => Action::CertifyLddap {
                    lddap_number: required_str(payload, "lddap_number")?,
                    certification_date: required_date(payload, "certification_date")?,
                },
                _ => return Err(CoreError::InvalidTransition { from: status, action: name }),
            },
            ActionName::SendOut => Action::SendOut {
                approval_out_date: required_date(payload, "approval_out_date")?,
            },
            ActionName::ReturnIn => Action::ReturnIn {
                approval_in_date: required_date(payload, "approval_in_date")?,
                approved_by: required_str(payload, "approved_by")?,
            },
            ActionName::Index => Action::Index {
                indexing_date: required_date(payload, "indexing_date")?,
            },
            ActionName::SetMethod => {
                let raw = required_str(payload, "method")?;
                let method = raw.parse::<PaymentMethod>().map_err(|e| {
                    CoreError::format("method", "one of check, lddap, payroll", raw.as_str(), e)
                })?;
                Action::SetMethod {
                    method,
                    lddap_number: optional_str(payload, "lddap_number"),
                }
            }
            ActionName::OutToCashiering => Action::OutToCashiering,
            ActionName::SendForEngas => Action::SendForEngas,
            ActionName::Record => match status {
                DvStatus::ForEngas => Action::RecordEngas {
                    engas_number: required_str(payload, "engas_number")?,
                    engas_date: required_date(payload, "engas_date")?,
                },
                DvStatus::ForCdj => Action::RecordCdj {
                    cdj_date: required_date(payload, "cdj_date")?,
                },
                _ => return Err(CoreError::InvalidTransition { from: status, action: name }),
            },
            ActionName::Reallocate => Action::Reallocate {
                reason: optional_str(payload, "reason"),
            },
        };
        Ok(action)
    }
}

fn optional_str(payload: &Payload, field: &str) -> Option<String> {
    payload
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_str(payload: &Payload, field: &str) -> CoreResult<String> {
    optional_str(payload, field).ok_or_else(|| CoreError::MissingField(field.to_string()))
}

fn required_date(payload: &Payload, field: &str) -> CoreResult<NaiveDate> {
    parse_date(field, &required_str(payload, field)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> Payload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_action_name_round_trip() {
        for name in ACTION_NAMES {
            assert_eq!(name.to_string().parse::<ActionName>().unwrap(), *name);
            assert_eq!(serde_json::to_string(name).unwrap(), format!("\"{}\"", name));
        }
        assert!("approve".parse::<ActionName>().is_err());
    }

    #[test]
    fn test_from_payload_allocate() {
        let p = payload(&[
            ("allocation_date", "2025-06-02"),
            ("allocation_number", " 2025-06-04734 "),
            ("net_amount", "12500.50"),
        ]);
        let action = Action::from_payload(ActionName::Allocate, DvStatus::ForCashAllocation, &p).unwrap();
        assert_eq!(
            action,
            Action::Allocate {
                allocation_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                allocation_number: "2025-06-04734".to_string(),
                net_amount: Decimal::new(1250050, 2),
            }
        );
        assert_eq!(action.label(), "Cash Allocation");
    }

    #[test]
    fn test_from_payload_missing_field() {
        let p = payload(&[("rts_out_date", "2025-06-02")]);
        let err = Action::from_payload(ActionName::RtsOut, DvStatus::ForReview, &p).unwrap_err();
        assert_eq!(err, CoreError::MissingField("rts_reason".to_string()));
    }

    #[test]
    fn test_from_payload_blank_reason_is_missing() {
        let p = payload(&[("rts_out_date", "2025-06-02"), ("rts_reason", "   ")]);
        let err = Action::from_payload(ActionName::RtsOut, DvStatus::ForReview, &p).unwrap_err();
        assert_eq!(err, CoreError::MissingField("rts_reason".to_string()));
    }

    #[test]
    fn test_from_payload_bad_date() {
        let p = payload(&[("indexing_date", "2025-02-30")]);
        let err = Action::from_payload(ActionName::Index, DvStatus::ForIndexing, &p).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_from_payload_certify_depends_on_status() {
        let empty = Payload::new();
        assert_eq!(
            Action::from_payload(ActionName::Certify, DvStatus::ForBoxC, &empty).unwrap(),
            Action::CertifyBoxC
        );

        let err = Action::from_payload(ActionName::Certify, DvStatus::ForLddap, &empty).unwrap_err();
        assert_eq!(err, CoreError::MissingField("lddap_number".to_string()));

        let err = Action::from_payload(ActionName::Certify, DvStatus::ForReview, &empty).unwrap_err();
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_from_payload_record_depends_on_status() {
        let p = payload(&[("cdj_date", "2025-07-10")]);
        let action = Action::from_payload(ActionName::Record, DvStatus::ForCdj, &p).unwrap();
        assert_eq!(action.name(), ActionName::Record);
        assert_eq!(action.label(), "CDJ Recorded");

        let err = Action::from_payload(ActionName::Record, DvStatus::ForEngas, &p).unwrap_err();
        assert_eq!(err, CoreError::MissingField("engas_number".to_string()));
    }

    #[test]
    fn test_from_payload_unknown_method() {
        let p = payload(&[("method", "cash")]);
        let err = Action::from_payload(ActionName::SetMethod, DvStatus::ForPaymentMethod, &p).unwrap_err();
        match err {
            CoreError::FormatError { field, .. } => assert_eq!(field, "method"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_payload_reallocate_reason_optional() {
        let action = Action::from_payload(ActionName::Reallocate, DvStatus::Processed, &Payload::new()).unwrap();
        assert_eq!(action, Action::Reallocate { reason: None });
    }

    #[test]
    fn test_action_serde_tagged() {
        let action = Action::RecordCdj {
            cdj_date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["action"], "record_cdj");
        assert_eq!(value["cdj_date"], "2025-07-10");
    }
}
