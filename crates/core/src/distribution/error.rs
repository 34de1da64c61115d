//! Error types for split calculation, allocation, and distribution.

use lexum_shared::{ErrorKind, StoreError};
use lexum_shared::types::AgreementId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the split calculator.
///
/// These are pure input-range validations; the calculator has no other
/// failure path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Principal amount is negative.
    #[error("principal amount cannot be negative, got {0}")]
    NegativePrincipal(Decimal),

    /// Success fee is negative.
    #[error("success fee cannot be negative, got {0}")]
    NegativeSuccessFee(Decimal),

    /// Office percent falls outside 0–100.
    #[error("office percent must be between 0 and 100, got {0}")]
    OfficePercentOutOfRange(Decimal),
}

/// Errors raised by the allocation functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// Nothing to allocate to.
    #[error("allocation requires at least one share")]
    ZeroCount,

    /// Total amount is negative.
    #[error("allocation total cannot be negative, got {0}")]
    NegativeTotal(Decimal),

    /// A weight is zero or negative.
    #[error("allocation weights must be positive, got {0}")]
    NonPositiveWeight(Decimal),
}

/// Errors raised while creating an agreement or recalculating its
/// installment distribution.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Installment count must be at least 1.
    #[error("installment count must be at least 1")]
    InvalidInstallmentCount,

    /// Total value must be strictly positive.
    #[error("total value must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// A monetary input carries more than 2 decimal places.
    #[error("{field} must have at most 2 decimal places, got {value}")]
    TooManyDecimalPlaces {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Weighted distribution requested without a weight vector.
    #[error("weighted distribution requires a weight vector")]
    WeightsRequired,

    /// Equal distribution does not accept a weight vector.
    #[error("weights only apply to weighted distribution")]
    WeightsNotAllowed,

    /// Weight vector length does not match the installment count.
    #[error("weight vector has {got} entries, expected {expected}")]
    WeightCountMismatch {
        /// Installment count of the agreement.
        expected: u32,
        /// Length of the supplied weight vector.
        got: usize,
    },

    /// Due-date arithmetic left the supported calendar range.
    #[error("installment due date overflows the calendar range")]
    DueDateOverflow,

    /// Invalid split input (negative amounts, percent out of range).
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Invalid allocation input.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The agreement does not exist.
    #[error("agreement not found: {0}")]
    AgreementNotFound(AgreementId),

    /// Recalculation is forbidden once money has moved. Pinned,
    /// user-displayable message.
    #[error("cannot recalculate distribution with already-settled installments")]
    AlreadySettled,

    /// Recalculation would silently discard manual edits.
    #[error("cannot recalculate distribution over manually edited installments without overwrite confirmation")]
    ManualEditsPresent,

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DistributionError {
    /// Maps this error onto the engine's taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInstallmentCount
            | Self::NonPositiveTotal(_)
            | Self::TooManyDecimalPlaces { .. }
            | Self::WeightsRequired
            | Self::WeightsNotAllowed
            | Self::WeightCountMismatch { .. }
            | Self::DueDateOverflow
            | Self::Split(_)
            | Self::Allocation(_) => ErrorKind::Validation,
            Self::AgreementNotFound(_) => ErrorKind::NotFound,
            Self::AlreadySettled | Self::ManualEditsPresent => ErrorKind::BusinessRule,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInstallmentCount => "INVALID_INSTALLMENT_COUNT",
            Self::NonPositiveTotal(_) => "NON_POSITIVE_TOTAL",
            Self::TooManyDecimalPlaces { .. } => "TOO_MANY_DECIMAL_PLACES",
            Self::WeightsRequired => "WEIGHTS_REQUIRED",
            Self::WeightsNotAllowed => "WEIGHTS_NOT_ALLOWED",
            Self::WeightCountMismatch { .. } => "WEIGHT_COUNT_MISMATCH",
            Self::DueDateOverflow => "DUE_DATE_OVERFLOW",
            Self::Split(_) => "INVALID_SPLIT_INPUT",
            Self::Allocation(_) => "INVALID_ALLOCATION_INPUT",
            Self::AgreementNotFound(_) => "AGREEMENT_NOT_FOUND",
            Self::AlreadySettled => "ALREADY_SETTLED",
            Self::ManualEditsPresent => "MANUAL_EDITS_PRESENT",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
