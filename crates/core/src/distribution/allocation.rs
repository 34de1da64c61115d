//! Amount allocation with the remainder-to-last policy.
//!
//! Distribution of an agreement total across installments truncates each
//! share to 2 decimal places and assigns the accumulated rounding
//! remainder to the final installment, so the shares always sum to the
//! total exactly. The remainder landing on the *last* installment (rather
//! than being spread) is an audit requirement: reviewers reconcile the
//! schedule against the agreement by checking the last line.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::AllocationError;

/// Allocates `total` into `count` equal shares.
///
/// Each share is `total / count` truncated to 2 decimal places; the last
/// share absorbs the remainder so the sum equals `total` exactly.
///
/// # Errors
///
/// Returns an error when `count` is zero or `total` is negative.
pub fn allocate_equal(total: Decimal, count: u32) -> Result<Vec<Decimal>, AllocationError> {
    if count == 0 {
        return Err(AllocationError::ZeroCount);
    }
    if total < Decimal::ZERO {
        return Err(AllocationError::NegativeTotal(total));
    }

    let count_dec = Decimal::from(count);
    let base = (total / count_dec).round_dp_with_strategy(2, RoundingStrategy::ToZero);

    let mut shares = vec![base; count as usize];
    let allocated = base * (count_dec - Decimal::ONE);
    shares[count as usize - 1] = total - allocated;
    Ok(shares)
}

/// Allocates `total` proportionally to `weights`.
///
/// Every share except the last is `total × weight / Σweights` truncated
/// to 2 decimal places; the last share absorbs the remainder.
///
/// # Errors
///
/// Returns an error when the weight vector is empty, any weight is not
/// strictly positive, or `total` is negative.
pub fn allocate_weighted(total: Decimal, weights: &[Decimal]) -> Result<Vec<Decimal>, AllocationError> {
    if weights.is_empty() {
        return Err(AllocationError::ZeroCount);
    }
    if total < Decimal::ZERO {
        return Err(AllocationError::NegativeTotal(total));
    }
    if let Some(&bad) = weights.iter().find(|w| **w <= Decimal::ZERO) {
        return Err(AllocationError::NonPositiveWeight(bad));
    }

    let weight_sum: Decimal = weights.iter().copied().sum();
    let mut shares = Vec::with_capacity(weights.len());
    let mut allocated = Decimal::ZERO;

    for weight in &weights[..weights.len() - 1] {
        let share =
            (total * *weight / weight_sum).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        allocated += share;
        shares.push(share);
    }
    shares.push(total - allocated);
    Ok(shares)
}
