//! State transition logic
//!
//! Pure functions for applying actions to vouchers. A transition never mutates
//! its input: it validates against the current snapshot, builds the next
//! snapshot from a copy, appends exactly one audit entry and hands both back.
//! On any error the caller's snapshot is untouched and nothing is recorded.

use chrono::{DateTime, Datelike, Utc};

use crate::errors::{CoreError, CoreResult};
use crate::schemas::{
    Action, ActionName, ApprovalFields, AuditEntry, CashAllocation, DetourOrigin,
    DisbursementVoucher, DvStatus, EngasRecord, LddapCertification, NewAuditEntry, NorsaRecord,
    Payload, PaymentMethod, PaymentSelection, RtsRecord,
};

use super::reallocation;
use super::states::resolve_target;
use super::validation::{
    validate_cash_allocation_number, validate_date_order, validate_engas_number,
    validate_lddap_ada_number, validate_lddap_certification_number, validate_non_empty,
    validate_norsa_number, validate_positive_amount,
};

/// Who is acting, and when
#[derive(Debug, Clone)]
pub struct TransitionContext {
    /// Recorded as the audit entry's actor
    pub actor: String,

    /// Recorded as the audit entry's timestamp; its year bounds NORSA numbers
    pub now: DateTime<Utc>,

    /// Reject "in" dates earlier than the matching "out" date
    pub enforce_date_order: bool,
}

impl TransitionContext {
    /// Context for `actor` at the current time
    pub fn new(actor: impl Into<String>) -> Self {
        TransitionContext {
            actor: actor.into(),
            now: Utc::now(),
            enforce_date_order: false,
        }
    }

    /// Return the context with a fixed clock
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Return the context with date ordering checks on or off
    pub fn with_date_order(mut self, enforce: bool) -> Self {
        self.enforce_date_order = enforce;
        self
    }

    fn current_year(&self) -> i32 {
        self.now.year()
    }
}

/// An accepted transition: the next snapshot and the entry it appended
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The voucher after the transition
    pub voucher: DisbursementVoucher,

    /// The audit entry recorded for the transition (also the ledger's last entry)
    pub entry: AuditEntry,
}

/// Apply a named action with a loose field map.
///
/// This is the entry point for form-driven callers. `reallocate` is handed to
/// the reallocation manager.
///
/// # Errors
/// * `InvalidTransition` - the action is not legal from the current status
/// * `MissingField` / `FormatError` - the payload is incomplete or malformed
/// * `PreconditionFailed` - the voucher is not ready for the action
pub fn apply_action(
    voucher: &DisbursementVoucher,
    name: ActionName,
    payload: &Payload,
    ctx: &TransitionContext,
) -> CoreResult<TransitionOutcome> {
    if resolve_target(voucher, name).is_none() {
        return Err(reject(voucher, name));
    }
    let action = Action::from_payload(name, voucher.status, payload)?;
    apply_transition(voucher, &action, ctx)
}

/// Apply a typed action.
///
/// # Errors
/// Same as [`apply_action`].
pub fn apply_transition(
    voucher: &DisbursementVoucher,
    action: &Action,
    ctx: &TransitionContext,
) -> CoreResult<TransitionOutcome> {
    let name = action.name();
    let target = match resolve_target(voucher, name) {
        Some(target) => target,
        None => return Err(reject(voucher, name)),
    };

    if let Action::Reallocate { reason } = action {
        return reallocation::reallocate(voucher, reason.as_deref(), ctx);
    }

    let mut next = voucher.clone();
    let recorded = match set_stage_fields(&mut next, action, ctx) {
        Ok(recorded) => recorded,
        Err(e) => {
            tracing::debug!(
                voucher = %voucher.id,
                action = %name,
                status = %voucher.status,
                code = e.code(),
                "transition rejected"
            );
            return Err(e);
        }
    };
    next.status = target;
    Ok(commit_transition(next, voucher.status, action, recorded, ctx))
}

/// Record an accepted transition on `next` and package the outcome.
///
/// `next` must already carry its new status and fields.
pub(crate) fn commit_transition(
    mut next: DisbursementVoucher,
    from: DvStatus,
    action: &Action,
    payload: Payload,
    ctx: &TransitionContext,
) -> TransitionOutcome {
    next.version += 1;
    next.updated_at = ctx.now;
    let entry = next
        .history
        .append(NewAuditEntry {
            timestamp: ctx.now,
            actor: ctx.actor.clone(),
            action: action.name(),
            label: action.label().to_string(),
            status_before: from,
            status_after: next.status,
            cycle: next.cycle,
            payload,
        })
        .clone();
    tracing::debug!(
        voucher = %next.id,
        action = %entry.action,
        from = %entry.status_before,
        to = %entry.status_after,
        "transition applied"
    );
    TransitionOutcome {
        voucher: next,
        entry,
    }
}

fn reject(voucher: &DisbursementVoucher, action: ActionName) -> CoreError {
    tracing::debug!(
        voucher = %voucher.id,
        action = %action,
        status = %voucher.status,
        "transition not allowed"
    );
    CoreError::InvalidTransition {
        from: voucher.status,
        action,
    }
}

/// Validate the action against `next` and write its fields.
///
/// Every check runs before the first write, so an error leaves `next`
/// as it was. Returns the audit payload.
fn set_stage_fields(
    next: &mut DisbursementVoucher,
    action: &Action,
    ctx: &TransitionContext,
) -> CoreResult<Payload> {
    let mut recorded = Payload::new();
    let from = next.status;

    match (from, action) {
        (DvStatus::ForReview, Action::ReviewDone) => {}

        (DvStatus::ForReview | DvStatus::ForBoxC, Action::RtsOut { rts_out_date, rts_reason }) => {
            let reason = validate_non_empty("rts_reason", rts_reason)?;
            let origin = detour_origin_of(from)?;
            record(&mut recorded, "origin", origin);
            record(&mut recorded, "rts_out_date", rts_out_date);
            record(&mut recorded, "rts_reason", &reason);
            next.detour_fields_mut(origin).rts = Some(RtsRecord {
                out_date: *rts_out_date,
                reason,
                in_date: None,
            });
            next.detour_origin = Some(origin);
        }

        (DvStatus::ForRtsIn, Action::RtsIn { rts_in_date }) => {
            let origin = active_detour(next)?;
            let rts = next.detour_fields(origin).rts.clone().ok_or_else(|| {
                CoreError::PreconditionFailed("no RTS out record for the active detour".to_string())
            })?;
            if ctx.enforce_date_order {
                validate_date_order("rts_out_date", rts.out_date, "rts_in_date", *rts_in_date)?;
            }
            record(&mut recorded, "origin", origin);
            record(&mut recorded, "rts_in_date", rts_in_date);
            next.detour_fields_mut(origin).rts = Some(RtsRecord {
                in_date: Some(*rts_in_date),
                ..rts
            });
            next.detour_origin = None;
        }

        (DvStatus::ForReview | DvStatus::ForBoxC, Action::NorsaOut { norsa_number, norsa_date }) => {
            let number = validate_norsa_number(norsa_number, ctx.current_year())?;
            let origin = detour_origin_of(from)?;
            record(&mut recorded, "origin", origin);
            record(&mut recorded, "norsa_number", &number);
            record(&mut recorded, "norsa_date", norsa_date);
            next.detour_fields_mut(origin).norsa = Some(NorsaRecord {
                number,
                date: *norsa_date,
                in_date: None,
            });
            next.detour_origin = Some(origin);
        }

        (DvStatus::ForNorsaIn, Action::NorsaIn { norsa_in_date }) => {
            let origin = active_detour(next)?;
            let norsa = next.detour_fields(origin).norsa.clone().ok_or_else(|| {
                CoreError::PreconditionFailed("no NORSA out record for the active detour".to_string())
            })?;
            if ctx.enforce_date_order {
                validate_date_order("norsa_date", norsa.date, "norsa_in_date", *norsa_in_date)?;
            }
            record(&mut recorded, "origin", origin);
            record(&mut recorded, "norsa_in_date", norsa_in_date);
            next.detour_fields_mut(origin).norsa = Some(NorsaRecord {
                in_date: Some(*norsa_in_date),
                ..norsa
            });
            next.detour_origin = None;
        }

        (
            DvStatus::ForCashAllocation,
            Action::Allocate {
                allocation_date,
                allocation_number,
                net_amount,
            },
        ) => {
            let number = validate_cash_allocation_number(allocation_number)?;
            let net_amount = validate_positive_amount("net_amount", *net_amount)?;
            record(&mut recorded, "allocation_date", allocation_date);
            record(&mut recorded, "allocation_number", &number);
            record(&mut recorded, "net_amount", net_amount);
            next.cycle_fields.cash_allocation = Some(CashAllocation {
                date: *allocation_date,
                number,
                net_amount,
            });
        }

        (DvStatus::ForBoxC, Action::CertifyBoxC) => {}

        (DvStatus::ForApproval, Action::SendOut { approval_out_date }) => {
            record(&mut recorded, "approval_out_date", approval_out_date);
            next.cycle_fields.approval.out_date = Some(*approval_out_date);
        }

        (
            DvStatus::ForApproval,
            Action::ReturnIn {
                approval_in_date,
                approved_by,
            },
        ) => {
            let approved_by = validate_non_empty("approved_by", approved_by)?;
            let out_date = next.cycle_fields.approval.out_date.ok_or_else(|| {
                CoreError::PreconditionFailed("voucher has not been sent out for approval".to_string())
            })?;
            if ctx.enforce_date_order {
                validate_date_order("approval_out_date", out_date, "approval_in_date", *approval_in_date)?;
            }
            record(&mut recorded, "approval_in_date", approval_in_date);
            record(&mut recorded, "approved_by", &approved_by);
            next.cycle_fields.approval = ApprovalFields {
                out_date: Some(out_date),
                in_date: Some(*approval_in_date),
                approved_by: Some(approved_by),
            };
        }

        (DvStatus::ForIndexing, Action::Index { indexing_date }) => {
            record(&mut recorded, "indexing_date", indexing_date);
            next.cycle_fields.indexing_date = Some(*indexing_date);
        }

        (DvStatus::ForPaymentMethod, Action::SetMethod { method, lddap_number }) => {
            let lddap_ada_number = match method {
                PaymentMethod::Lddap => {
                    let raw = lddap_number
                        .as_deref()
                        .ok_or_else(|| CoreError::MissingField("lddap_number".to_string()))?;
                    Some(validate_lddap_ada_number(raw)?)
                }
                PaymentMethod::Check | PaymentMethod::Payroll => None,
            };
            record(&mut recorded, "method", method);
            if let Some(number) = &lddap_ada_number {
                record(&mut recorded, "lddap_number", number);
            }
            next.cycle_fields.payment = Some(PaymentSelection {
                method: *method,
                lddap_ada_number,
            });
        }

        (DvStatus::ForPaymentMethod, Action::OutToCashiering | Action::SendForEngas) => {
            let payment = next.cycle_fields.payment.as_ref().ok_or_else(|| {
                CoreError::PreconditionFailed("payment method has not been selected".to_string())
            })?;
            record(&mut recorded, "method", payment.method);
        }

        (DvStatus::ForEngas, Action::RecordEngas { engas_number, engas_date }) => {
            let number = validate_engas_number(engas_number)?;
            record(&mut recorded, "engas_number", &number);
            record(&mut recorded, "engas_date", engas_date);
            next.cycle_fields.engas = Some(EngasRecord {
                number,
                date: *engas_date,
            });
        }

        (DvStatus::ForCdj, Action::RecordCdj { cdj_date }) => {
            record(&mut recorded, "cdj_date", cdj_date);
            next.cycle_fields.cdj_date = Some(*cdj_date);
        }

        (
            DvStatus::ForLddap,
            Action::CertifyLddap {
                lddap_number,
                certification_date,
            },
        ) => {
            let number = validate_lddap_certification_number(lddap_number)?;
            record(&mut recorded, "lddap_number", &number);
            record(&mut recorded, "certification_date", certification_date);
            next.cycle_fields.lddap = Some(LddapCertification {
                number,
                certification_date: *certification_date,
            });
            next.is_reallocated = false;
        }

        _ => {
            return Err(CoreError::InvalidTransition {
                from,
                action: action.name(),
            })
        }
    }

    Ok(recorded)
}

fn detour_origin_of(status: DvStatus) -> CoreResult<DetourOrigin> {
    DetourOrigin::from_status(status).ok_or_else(|| {
        CoreError::PreconditionFailed(format!("no detour can leave from {}", status))
    })
}

fn active_detour(voucher: &DisbursementVoucher) -> CoreResult<DetourOrigin> {
    voucher.detour_origin.ok_or_else(|| {
        CoreError::PreconditionFailed("voucher has no active detour origin".to_string())
    })
}

fn record(payload: &mut Payload, key: &str, value: impl ToString) {
    payload.insert(key.to_string(), value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tests::{
        drive, payload, processed_voucher, sample_voucher, CERTIFY_LDDAP, TO_LDDAP,
    };
    use crate::domain::states::allowed_actions;
    use chrono::{NaiveDate, TimeZone};

    fn ctx() -> TransitionContext {
        TransitionContext::new("accounting clerk")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_box_c() -> DisbursementVoucher {
        drive(sample_voucher(), &TO_LDDAP[..2])
    }

    #[test]
    fn test_full_lddap_path() {
        let voucher = processed_voucher();
        assert_eq!(voucher.status, DvStatus::Processed);
        assert_eq!(voucher.history.len(), TO_LDDAP.len() + CERTIFY_LDDAP.len());
        assert_eq!(voucher.version, voucher.history.len() as u64);

        let fields = &voucher.cycle_fields;
        assert_eq!(voucher.cash_allocation_number(), Some("2025-06-04734"));
        assert_eq!(fields.approval.approved_by.as_deref(), Some("Regional Director"));
        assert_eq!(fields.indexing_date, Some(date(2025, 6, 6)));
        assert_eq!(voucher.payment_method(), Some(PaymentMethod::Lddap));
        assert_eq!(
            fields.payment.as_ref().and_then(|p| p.lddap_ada_number.as_deref()),
            Some("101-06-001-2025")
        );
        assert_eq!(fields.engas.as_ref().map(|e| e.number.as_str()), Some("2025-07-000457"));
        assert_eq!(fields.cdj_date, Some(date(2025, 7, 2)));
        assert_eq!(
            fields.lddap.as_ref().map(|l| l.number.as_str()),
            Some("101-07-00123-00045")
        );

        let labels: Vec<&str> = voucher.history.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels[0], "Review Completed");
        assert_eq!(labels[2], "Box C Certification");
        assert_eq!(labels[labels.len() - 1], "LDDAP Certification");
        assert!(voucher.history.verify_chain().is_ok());
    }

    #[test]
    fn test_entry_records_actor_and_payload() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        let ctx = ctx().at(now);
        let voucher = drive(sample_voucher(), &TO_LDDAP[..1]);
        let p = payload(&[
            ("allocation_date", "2025-06-02"),
            ("allocation_number", "2025-06-04734"),
            ("net_amount", "14250.00"),
        ]);
        let outcome = apply_action(&voucher, ActionName::Allocate, &p, &ctx).unwrap();

        assert_eq!(outcome.entry.actor, "accounting clerk");
        assert_eq!(outcome.entry.timestamp, now);
        assert_eq!(outcome.entry.sequence, 2);
        assert_eq!(outcome.entry.label, "Cash Allocation");
        assert_eq!(outcome.entry.payload.get("net_amount").map(String::as_str), Some("14250.00"));
        assert_eq!(outcome.voucher.updated_at, now);
        assert_eq!(outcome.voucher.history.last(), Some(&outcome.entry));
    }

    #[test]
    fn test_cashiering_branch() {
        let voucher = drive(
            sample_voucher(),
            &[
                TO_LDDAP[0],
                TO_LDDAP[1],
                TO_LDDAP[2],
                TO_LDDAP[3],
                TO_LDDAP[4],
                TO_LDDAP[5],
                (ActionName::SetMethod, &[("method", "check")]),
                (ActionName::OutToCashiering, &[]),
            ],
        );
        assert_eq!(voucher.status, DvStatus::OutForCashiering);
        assert_eq!(voucher.payment_method(), Some(PaymentMethod::Check));
        assert!(allowed_actions(voucher.status).is_empty());

        let err = apply_action(&voucher, ActionName::Reallocate, &Payload::new(), &ctx()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_set_method_can_be_changed() {
        let at_method = drive(sample_voucher(), &TO_LDDAP[..6]);
        let voucher = drive(
            at_method,
            &[
                (ActionName::SetMethod, &[("method", "payroll")]),
                (ActionName::SetMethod, &[("method", "lddap"), ("lddap_number", "101-06-001-2025")]),
            ],
        );
        assert_eq!(voucher.status, DvStatus::ForPaymentMethod);
        assert_eq!(voucher.payment_method(), Some(PaymentMethod::Lddap));
    }

    #[test]
    fn test_lddap_method_requires_number() {
        let voucher = drive(sample_voucher(), &TO_LDDAP[..6]);
        let err = apply_action(&voucher, ActionName::SetMethod, &payload(&[("method", "lddap")]), &ctx())
            .unwrap_err();
        assert_eq!(err, CoreError::MissingField("lddap_number".to_string()));

        let p = payload(&[("method", "lddap"), ("lddap_number", "101-13-001-2025")]);
        let err = apply_action(&voucher, ActionName::SetMethod, &p, &ctx()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_send_for_engas_requires_method() {
        let voucher = drive(sample_voucher(), &TO_LDDAP[..6]);
        let err = apply_action(&voucher, ActionName::SendForEngas, &Payload::new(), &ctx()).unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));
        assert_eq!(voucher.status, DvStatus::ForPaymentMethod);
    }

    #[test]
    fn test_return_in_requires_send_out() {
        let voucher = drive(sample_voucher(), &TO_LDDAP[..3]);
        let p = payload(&[("approval_in_date", "2025-06-05"), ("approved_by", "Regional Director")]);
        let err = apply_action(&voucher, ActionName::ReturnIn, &p, &ctx()).unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));
    }

    #[test]
    fn test_rts_from_box_c_returns_to_box_c() {
        let voucher = at_box_c();
        let out = drive(
            voucher.clone(),
            &[(ActionName::RtsOut, &[("rts_out_date", "2025-06-03"), ("rts_reason", "unsigned ORS")])],
        );
        assert_eq!(out.status, DvStatus::ForRtsIn);
        assert_eq!(out.detour_origin, Some(DetourOrigin::BoxC));
        assert!(out.cycle_fields.box_c_detour.rts.is_some());
        assert!(out.review_detour.is_empty());

        let back = drive(out, &[(ActionName::RtsIn, &[("rts_in_date", "2025-06-04")])]);
        assert_eq!(back.status, DvStatus::ForBoxC);
        assert_eq!(back.detour_origin, None);
        let rts = back.cycle_fields.box_c_detour.rts.as_ref().unwrap();
        assert_eq!(rts.reason, "unsigned ORS");
        assert_eq!(rts.in_date, Some(date(2025, 6, 4)));
        assert_eq!(back.cash_allocation_number(), voucher.cash_allocation_number());
    }

    #[test]
    fn test_norsa_from_review_returns_to_review() {
        let voucher = drive(
            sample_voucher(),
            &[
                (ActionName::NorsaOut, &[("norsa_number", "2025-06-0012"), ("norsa_date", "2025-06-01")]),
                (ActionName::NorsaIn, &[("norsa_in_date", "2025-06-02")]),
            ],
        );
        assert_eq!(voucher.status, DvStatus::ForReview);
        let norsa = voucher.review_detour.norsa.as_ref().unwrap();
        assert_eq!(norsa.number, "2025-06-0012");
        assert_eq!(norsa.in_date, Some(date(2025, 6, 2)));
        assert_eq!(voucher.history.detours().len(), 2);
    }

    #[test]
    fn test_norsa_number_year_bounded_by_clock() {
        let ctx = ctx().at(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        let voucher = sample_voucher();
        let ok = payload(&[("norsa_number", "2026-01-0001"), ("norsa_date", "2025-06-01")]);
        assert!(apply_action(&voucher, ActionName::NorsaOut, &ok, &ctx).is_ok());

        let late = payload(&[("norsa_number", "2027-01-0001"), ("norsa_date", "2025-06-01")]);
        let err = apply_action(&voucher, ActionName::NorsaOut, &late, &ctx).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_allocation_number_format_error() {
        let voucher = drive(sample_voucher(), &TO_LDDAP[..1]);
        let p = payload(&[
            ("allocation_date", "2025-06-02"),
            ("allocation_number", "2025-6-4734"),
            ("net_amount", "14250.00"),
        ]);
        match apply_action(&voucher, ActionName::Allocate, &p, &ctx()).unwrap_err() {
            CoreError::FormatError { field, expected, .. } => {
                assert_eq!(field, "allocation_number");
                assert_eq!(expected, "YYYY-MM-NNNNN");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let voucher = drive(sample_voucher(), &TO_LDDAP[..5]);
        let err = apply_action(&voucher, ActionName::Index, &Payload::new(), &ctx()).unwrap_err();
        assert_eq!(err, CoreError::MissingField("indexing_date".to_string()));
    }

    #[test]
    fn test_invalid_transition_leaves_voucher_unchanged() {
        let voucher = sample_voucher();
        let before = serde_json::to_string(&voucher).unwrap();

        let err = apply_action(&voucher, ActionName::Allocate, &Payload::new(), &ctx()).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: DvStatus::ForReview,
                action: ActionName::Allocate,
            }
        );
        assert_eq!(serde_json::to_string(&voucher).unwrap(), before);

        let again = apply_action(&voucher, ActionName::Allocate, &Payload::new(), &ctx()).unwrap_err();
        assert_eq!(again, err);
    }

    #[test]
    fn test_typed_action_checks_status() {
        let voucher = sample_voucher();
        let action = Action::Index {
            indexing_date: date(2025, 6, 6),
        };
        assert!(matches!(
            apply_transition(&voucher, &action, &ctx()),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_detour_return_without_origin_is_invalid() {
        let mut voucher = sample_voucher();
        voucher.status = DvStatus::ForRtsIn;
        let p = payload(&[("rts_in_date", "2025-06-02")]);
        let err = apply_action(&voucher, ActionName::RtsIn, &p, &ctx()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_date_order_enforced_when_enabled() {
        let out = drive(
            sample_voucher(),
            &[(ActionName::RtsOut, &[("rts_out_date", "2025-06-10"), ("rts_reason", "wrong payee")])],
        );
        let early = payload(&[("rts_in_date", "2025-06-09")]);

        assert!(apply_action(&out, ActionName::RtsIn, &early, &ctx()).is_ok());

        let strict = ctx().with_date_order(true);
        let err = apply_action(&out, ActionName::RtsIn, &early, &strict).unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));

        let same_day = payload(&[("rts_in_date", "2025-06-10")]);
        assert!(apply_action(&out, ActionName::RtsIn, &same_day, &strict).is_ok());
    }

    #[test]
    fn test_reallocate_through_apply_action() {
        let voucher = processed_voucher();
        let p = payload(&[("reason", "account closed")]);
        let outcome = apply_action(&voucher, ActionName::Reallocate, &p, &ctx()).unwrap();
        assert_eq!(outcome.voucher.status, DvStatus::ForCashAllocation);
        assert_eq!(outcome.entry.label, "Reallocation");

        let err = apply_action(&outcome.voucher, ActionName::Reallocate, &p, &ctx()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn test_second_cycle_clears_reallocated_flag_when_processed() {
        let voucher = processed_voucher();
        let reopened = apply_action(&voucher, ActionName::Reallocate, &Payload::new(), &ctx())
            .unwrap()
            .voucher;
        assert!(reopened.is_reallocated);

        let done = drive(drive(reopened, &TO_LDDAP[1..]), CERTIFY_LDDAP);
        assert_eq!(done.status, DvStatus::Processed);
        assert_eq!(done.cycle, 2);
        assert!(!done.is_reallocated);
        assert_eq!(
            done.history.for_cycle(2).len(),
            TO_LDDAP.len() + CERTIFY_LDDAP.len()
        );
    }
}
