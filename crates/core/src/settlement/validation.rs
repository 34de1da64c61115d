//! Installment integrity validation.
//!
//! Read-only audit of a single installment against its agreement
//! direction. The validator never fails: violations accumulate into a
//! report so callers see every problem at once, not just the first.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::agreement::types::{AgreementDirection, DisbursementStatus, Installment};

/// One violated integrity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum IntegrityViolation {
    /// A settled installment has no payment method recorded.
    MissingPaymentMethod,
    /// A receivable installment owes the client money but sits outside
    /// the disbursement workflow.
    RepaymentWithoutDisbursementFlow,
}

impl IntegrityViolation {
    /// Stable, user-displayable description of the violation.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingPaymentMethod => "settled installment has no payment method",
            Self::RepaymentWithoutDisbursementFlow => {
                "client repayment is owed but the disbursement workflow was never started"
            }
        }
    }
}

/// Outcome of validating one installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// True when no rule is violated.
    pub valid: bool,
    /// Every violated rule, in rule order.
    pub errors: Vec<IntegrityViolation>,
}

/// Validates an installment against the integrity rules.
///
/// Rules:
/// 1. A settled installment must carry a payment method.
/// 2. A receivable installment with a positive client repayment must not
///    sit in `nao_aplicavel`.
///
/// Violations accumulate; the report never short-circuits.
#[must_use]
pub fn validate_installment(
    installment: &Installment,
    direction: AgreementDirection,
) -> IntegrityReport {
    let mut errors = Vec::new();

    if installment.status.is_settled() && installment.payment_method.is_none() {
        errors.push(IntegrityViolation::MissingPaymentMethod);
    }

    if direction == AgreementDirection::Receivable
        && installment.status.is_settled()
        && installment.client_repayment > Decimal::ZERO
        && installment.disbursement_status == DisbursementStatus::NotApplicable
    {
        errors.push(IntegrityViolation::RepaymentWithoutDisbursementFlow);
    }

    IntegrityReport {
        valid: errors.is_empty(),
        errors,
    }
}
