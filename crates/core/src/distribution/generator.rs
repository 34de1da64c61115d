//! Installment schedule generation.
//!
//! Pure transformation from agreement parameters to a batch of
//! installment drafts. Persisting the batch is the service's job; the
//! store contract makes that write all-or-nothing.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::allocation::{allocate_equal, allocate_weighted};
use super::error::DistributionError;
use super::split::SplitCalculator;
use crate::agreement::types::{Agreement, DistributionMode, RecurrenceInterval};

/// One generated installment, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentDraft {
    /// 1-based position in the schedule.
    pub sequence: u32,
    /// Scheduled due date.
    pub due_date: NaiveDate,
    /// Gross principal share of this installment.
    pub gross_principal: Decimal,
    /// Contractual office fee carved out of the principal.
    pub contractual_fee: Decimal,
    /// Success-fee share allocated to this installment.
    pub success_fee: Decimal,
    /// `gross_principal − (contractual_fee + success_fee)`.
    pub client_repayment: Decimal,
}

/// Generates the full installment schedule for an agreement.
///
/// The total value and the total success fees are each allocated across
/// the installments (equal shares or the supplied weights, remainder to
/// the last installment), the split calculator derives the contractual
/// fee per installment, and due dates follow the recurrence interval
/// from the first due date.
///
/// # Errors
///
/// Fails on mode/weight mismatches, on due-date overflow, and on the
/// allocation and split input validations.
pub fn generate(
    agreement: &Agreement,
    weights: Option<&[Decimal]>,
) -> Result<Vec<InstallmentDraft>, DistributionError> {
    let count = agreement.installment_count;

    let (principals, success_fees) = match (agreement.distribution_mode, weights) {
        (DistributionMode::Equal, Some(_)) => return Err(DistributionError::WeightsNotAllowed),
        (DistributionMode::Equal, None) => (
            allocate_equal(agreement.total_value, count)?,
            allocate_equal(agreement.success_fees, count)?,
        ),
        (DistributionMode::Weighted, None) => return Err(DistributionError::WeightsRequired),
        (DistributionMode::Weighted, Some(weights)) => {
            if weights.len() != count as usize {
                return Err(DistributionError::WeightCountMismatch {
                    expected: count,
                    got: weights.len(),
                });
            }
            (
                allocate_weighted(agreement.total_value, weights)?,
                allocate_weighted(agreement.success_fees, weights)?,
            )
        }
    };

    let mut drafts = Vec::with_capacity(count as usize);
    for (index, (principal, success_fee)) in
        principals.into_iter().zip(success_fees).enumerate()
    {
        let index = u32::try_from(index).map_err(|_| DistributionError::DueDateOverflow)?;
        let due_date = agreement
            .interval
            .due_date(agreement.first_due_date, index)
            .ok_or(DistributionError::DueDateOverflow)?;

        let outcome = SplitCalculator::split(principal, success_fee, agreement.office_percent)?;
        drafts.push(InstallmentDraft {
            sequence: index + 1,
            due_date,
            gross_principal: principal,
            contractual_fee: outcome.contractual_fee,
            success_fee,
            // The installment invariant subtracts the success-fee share
            // from the gross principal as well.
            client_repayment: principal - outcome.contractual_fee - success_fee,
        });
    }

    Ok(drafts)
}

/// Convenience wrapper for equal-mode agreements.
///
/// # Errors
///
/// Same failure modes as [`generate`].
pub fn generate_equal(agreement: &Agreement) -> Result<Vec<InstallmentDraft>, DistributionError> {
    generate(agreement, None)
}
