//! Office/client split calculator.
//!
//! A single pure function derives how a principal amount divides between
//! the office (contractual fee plus success fee) and the client. Every
//! split in the engine goes through here: installment generation, the
//! optional recompute on settlement, and clearing a manual override.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::SplitError;

/// Result of applying the office/client split to a principal amount.
///
/// Transient value object; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// The principal amount the split was applied to.
    pub principal: Decimal,
    /// Contractual office fee, `principal × office_percent / 100`,
    /// rounded to 2 decimal places (banker's rounding).
    pub contractual_fee: Decimal,
    /// Everything the office keeps: contractual fee plus success fee.
    pub office_amount: Decimal,
    /// Amount owed back to the client: `principal − contractual_fee`.
    pub client_repayment: Decimal,
    /// The client share, in percent (`100 − office_percent`).
    pub client_percent: Decimal,
}

/// Stateless calculator for the office/client split.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Contractual office share applied when the agreement does not say
    /// otherwise, in percent.
    #[must_use]
    pub fn default_office_percent() -> Decimal {
        Decimal::new(30, 0)
    }

    /// Splits `principal` between office and client.
    ///
    /// The contractual fee is carved out of the principal; the success fee
    /// is charged on top of it. The outcome therefore satisfies
    /// `office_amount + client_repayment == principal + success_fee`
    /// exactly.
    ///
    /// # Errors
    ///
    /// Returns a [`SplitError`] when the principal or success fee is
    /// negative, or the office percent falls outside 0–100. No other
    /// failure paths exist.
    pub fn split(
        principal: Decimal,
        success_fee: Decimal,
        office_percent: Decimal,
    ) -> Result<SplitOutcome, SplitError> {
        if principal < Decimal::ZERO {
            return Err(SplitError::NegativePrincipal(principal));
        }
        if success_fee < Decimal::ZERO {
            return Err(SplitError::NegativeSuccessFee(success_fee));
        }
        if office_percent < Decimal::ZERO || office_percent > Decimal::ONE_HUNDRED {
            return Err(SplitError::OfficePercentOutOfRange(office_percent));
        }

        let contractual_fee = (principal * office_percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

        Ok(SplitOutcome {
            principal,
            contractual_fee,
            office_amount: contractual_fee + success_fee,
            client_repayment: principal - contractual_fee,
            client_percent: Decimal::ONE_HUNDRED - office_percent,
        })
    }
}
