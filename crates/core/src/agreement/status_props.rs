//! Property-based tests for status derivation.
//!
//! These tests pin down the derivation rules with randomized installment
//! sets rather than hand-picked examples.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::agreement::status::{derive_agreement_status, installment_effective_status};
use crate::agreement::types::{
    AgreementStatus, DisbursementStatus, EffectiveInstallmentStatus, Installment,
    InstallmentStatus,
};
use lexum_shared::types::{AgreementId, InstallmentId};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn arb_status() -> impl Strategy<Value = InstallmentStatus> {
    prop_oneof![
        Just(InstallmentStatus::Pending),
        Just(InstallmentStatus::Received),
        Just(InstallmentStatus::Paid),
        Just(InstallmentStatus::Cancelled),
    ]
}

/// Due dates spread around `today`, -60 to +60 days.
fn arb_installment() -> impl Strategy<Value = Installment> {
    (arb_status(), -60i64..=60i64).prop_map(|(status, offset)| {
        let due_date = if offset >= 0 {
            today() + Days::new(offset.unsigned_abs())
        } else {
            today() - Days::new(offset.unsigned_abs())
        };
        Installment {
            id: InstallmentId::new(),
            agreement_id: AgreementId::new(),
            sequence: 1,
            due_date,
            gross_principal: Decimal::new(50_000, 2),
            contractual_fee: Decimal::new(15_000, 2),
            success_fee: Decimal::ZERO,
            client_repayment: Decimal::new(35_000, 2),
            status,
            settlement_date: None,
            payment_method: None,
            disbursement_status: DisbursementStatus::NotApplicable,
            manually_edited: false,
            cancellation_reason: None,
            declaration_ref: None,
            declared_at: None,
            disbursement_proof_ref: None,
            disbursement_date: None,
            disbursed_by: None,
            version: 0,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Effective installment status
    // =========================================================================

    /// Overdue exactly when pending and strictly past due.
    #[test]
    fn prop_effective_overdue_iff_pending_past_due(installment in arb_installment()) {
        let effective = installment_effective_status(&installment, today());
        let expect_overdue =
            installment.status == InstallmentStatus::Pending && installment.due_date < today();
        prop_assert_eq!(
            effective == EffectiveInstallmentStatus::Overdue,
            expect_overdue
        );
    }

    /// Non-pending statuses pass through unchanged.
    #[test]
    fn prop_effective_preserves_stored_status(installment in arb_installment()) {
        let effective = installment_effective_status(&installment, today());
        match installment.status {
            InstallmentStatus::Received => {
                prop_assert_eq!(effective, EffectiveInstallmentStatus::Received);
            }
            InstallmentStatus::Paid => {
                prop_assert_eq!(effective, EffectiveInstallmentStatus::Paid);
            }
            InstallmentStatus::Cancelled => {
                prop_assert_eq!(effective, EffectiveInstallmentStatus::Cancelled);
            }
            InstallmentStatus::Pending => {}
        }
    }

    // =========================================================================
    // Aggregate agreement status
    // =========================================================================

    /// The aggregate is `atrasado` exactly when some installment is overdue.
    #[test]
    fn prop_agreement_overdue_iff_any_overdue(
        installments in prop::collection::vec(arb_installment(), 0..12)
    ) {
        let derived = derive_agreement_status(&installments, today());
        let any_overdue = installments.iter().any(|i| i.is_overdue(today()));
        prop_assert_eq!(derived == AgreementStatus::Overdue, any_overdue);
    }

    /// Without overdue installments, the aggregate follows settled counts
    /// over non-cancelled installments only.
    #[test]
    fn prop_agreement_settled_counts(
        installments in prop::collection::vec(arb_installment(), 0..12)
    ) {
        let derived = derive_agreement_status(&installments, today());
        prop_assume!(derived != AgreementStatus::Overdue);

        let active = installments
            .iter()
            .filter(|i| i.status != InstallmentStatus::Cancelled)
            .count();
        let settled = installments
            .iter()
            .filter(|i| i.status.is_settled())
            .count();

        let expected = if active > 0 && settled == active {
            AgreementStatus::FullyPaid
        } else if settled > 0 {
            AgreementStatus::PartiallyPaid
        } else {
            AgreementStatus::Pending
        };
        prop_assert_eq!(derived, expected);
    }

    /// Cancelled installments never affect the derived status.
    #[test]
    fn prop_cancelled_installments_are_transparent(
        installments in prop::collection::vec(arb_installment(), 0..8),
        cancelled in prop::collection::vec(arb_installment(), 0..4)
    ) {
        let with_cancelled: Vec<Installment> = installments
            .iter()
            .cloned()
            .chain(cancelled.into_iter().map(|mut i| {
                i.status = InstallmentStatus::Cancelled;
                i
            }))
            .collect();

        prop_assert_eq!(
            derive_agreement_status(&installments, today()),
            derive_agreement_status(&with_cancelled, today())
        );
    }
}
