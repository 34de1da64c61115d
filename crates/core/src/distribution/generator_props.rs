//! Property-based tests for the split calculator and the generator.
//!
//! The two audit-critical laws are pinned over randomized inputs: the
//! split conserves money, and a generated schedule sums to the agreement
//! total exactly.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::generator::generate;
use super::split::SplitCalculator;
use crate::agreement::types::{
    Agreement, AgreementDirection, AgreementKind, DistributionMode, RecurrenceInterval,
};
use lexum_shared::types::{AgreementId, CaseId};

/// Cent-precise amounts up to 10 million.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentages with up to 2 decimal places.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis_points| Decimal::new(basis_points, 2))
}

fn arb_interval() -> impl Strategy<Value = RecurrenceInterval> {
    prop_oneof![
        Just(RecurrenceInterval::Monthly),
        Just(RecurrenceInterval::Biweekly),
        Just(RecurrenceInterval::Weekly),
        (1u32..=90).prop_map(RecurrenceInterval::EveryDays),
    ]
}

fn agreement(
    total: Decimal,
    count: u32,
    office_percent: Decimal,
    success_fees: Decimal,
    interval: RecurrenceInterval,
) -> Agreement {
    Agreement {
        id: AgreementId::new(),
        case_id: CaseId::new(),
        kind: AgreementKind::Negotiated,
        direction: AgreementDirection::Receivable,
        total_value: total,
        installment_count: count,
        first_due_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        interval,
        distribution_mode: DistributionMode::Equal,
        office_percent,
        success_fees,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// office_amount + client_repayment == principal + success_fee, always.
    #[test]
    fn prop_split_conserves_money(
        principal in arb_amount(),
        success_fee in arb_amount(),
        office_percent in arb_percent(),
    ) {
        let outcome = SplitCalculator::split(principal, success_fee, office_percent).unwrap();
        prop_assert_eq!(
            outcome.office_amount + outcome.client_repayment,
            principal + success_fee
        );
    }

    /// The contractual fee never exceeds the principal.
    #[test]
    fn prop_split_fee_bounded_by_principal(
        principal in arb_amount(),
        office_percent in arb_percent(),
    ) {
        let outcome = SplitCalculator::split(principal, Decimal::ZERO, office_percent).unwrap();
        prop_assert!(outcome.contractual_fee >= Decimal::ZERO);
        prop_assert!(outcome.contractual_fee <= principal);
    }

    /// Generated principals and success fees sum to the agreement totals
    /// exactly, whatever the count.
    #[test]
    fn prop_generated_schedule_sums_to_total(
        total in arb_amount(),
        success_fees in arb_amount(),
        count in 1u32..=36,
        office_percent in arb_percent(),
        interval in arb_interval(),
    ) {
        let agreement = agreement(total, count, office_percent, success_fees, interval);
        let drafts = generate(&agreement, None).unwrap();

        prop_assert_eq!(drafts.len(), count as usize);
        let principal_sum: Decimal = drafts.iter().map(|d| d.gross_principal).sum();
        let fee_sum: Decimal = drafts.iter().map(|d| d.success_fee).sum();
        prop_assert_eq!(principal_sum, total);
        prop_assert_eq!(fee_sum, success_fees);
    }

    /// Only the last installment can differ from the others.
    #[test]
    fn prop_remainder_only_on_last(
        total in arb_amount(),
        count in 2u32..=24,
    ) {
        let agreement = agreement(
            total,
            count,
            Decimal::new(30, 0),
            Decimal::ZERO,
            RecurrenceInterval::Monthly,
        );
        let drafts = generate(&agreement, None).unwrap();
        let first = drafts[0].gross_principal;
        for draft in &drafts[..drafts.len() - 1] {
            prop_assert_eq!(draft.gross_principal, first);
        }
    }

    /// Per-installment invariant:
    /// client_repayment = gross − (contractual_fee + success_fee).
    #[test]
    fn prop_generated_client_repayment_invariant(
        total in arb_amount(),
        success_fees in arb_amount(),
        count in 1u32..=12,
        office_percent in arb_percent(),
    ) {
        let agreement = agreement(
            total,
            count,
            office_percent,
            success_fees,
            RecurrenceInterval::Monthly,
        );
        let drafts = generate(&agreement, None).unwrap();
        for draft in &drafts {
            prop_assert_eq!(
                draft.client_repayment,
                draft.gross_principal - draft.contractual_fee - draft.success_fee
            );
        }
    }

    /// Due dates are strictly increasing along the schedule.
    #[test]
    fn prop_due_dates_strictly_increase(
        count in 2u32..=24,
        interval in arb_interval(),
    ) {
        let agreement = agreement(
            Decimal::new(100_000, 2),
            count,
            Decimal::new(30, 0),
            Decimal::ZERO,
            interval,
        );
        let drafts = generate(&agreement, None).unwrap();
        for pair in drafts.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
    }
}
