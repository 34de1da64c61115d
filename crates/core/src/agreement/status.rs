//! Centralized status derivation.
//!
//! Overdue and aggregate agreement statuses are computed here and nowhere
//! else. Callers pass `today` explicitly so the derivation stays pure and
//! testable.

use chrono::NaiveDate;

use super::types::{
    AgreementStatus, EffectiveInstallmentStatus, Installment, InstallmentStatus,
};

/// Effective status of a single installment, including the derived
/// `atrasada` state.
///
/// An installment is overdue when it is still pending and its due date is
/// strictly before `today`; one due today is not yet overdue.
#[must_use]
pub fn installment_effective_status(
    installment: &Installment,
    today: NaiveDate,
) -> EffectiveInstallmentStatus {
    match installment.status {
        InstallmentStatus::Pending if installment.due_date < today => {
            EffectiveInstallmentStatus::Overdue
        }
        InstallmentStatus::Pending => EffectiveInstallmentStatus::Pending,
        InstallmentStatus::Received => EffectiveInstallmentStatus::Received,
        InstallmentStatus::Paid => EffectiveInstallmentStatus::Paid,
        InstallmentStatus::Cancelled => EffectiveInstallmentStatus::Cancelled,
    }
}

/// Aggregate status of an agreement, derived from its installments.
///
/// Priority order:
/// 1. any overdue installment → `atrasado`
/// 2. every non-cancelled installment settled (and at least one exists) → `pago_total`
/// 3. at least one settled → `pago_parcial`
/// 4. otherwise → `pendente`
///
/// Cancelled installments never count toward completion; an agreement with
/// no installments, or only cancelled ones, is `pendente`.
#[must_use]
pub fn derive_agreement_status(installments: &[Installment], today: NaiveDate) -> AgreementStatus {
    let mut any_overdue = false;
    let mut active = 0usize;
    let mut settled = 0usize;

    for installment in installments {
        match installment.status {
            InstallmentStatus::Cancelled => {}
            InstallmentStatus::Pending => {
                active += 1;
                if installment.due_date < today {
                    any_overdue = true;
                }
            }
            InstallmentStatus::Received | InstallmentStatus::Paid => {
                active += 1;
                settled += 1;
            }
        }
    }

    if any_overdue {
        AgreementStatus::Overdue
    } else if active > 0 && settled == active {
        AgreementStatus::FullyPaid
    } else if settled > 0 {
        AgreementStatus::PartiallyPaid
    } else {
        AgreementStatus::Pending
    }
}
