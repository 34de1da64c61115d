//! Error types for settlement operations.

use lexum_shared::types::{AgreementId, InstallmentId};
use lexum_shared::{ErrorKind, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::agreement::types::InstallmentStatus;

/// Errors raised while settling, cancelling, or editing an installment.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The installment does not exist.
    #[error("installment not found: {0}")]
    InstallmentNotFound(InstallmentId),

    /// The installment references an agreement that no longer exists.
    #[error("agreement not found: {0}")]
    AgreementNotFound(AgreementId),

    /// The installment is already settled.
    #[error("installment is already settled as {0}")]
    AlreadySettled(InstallmentStatus),

    /// The installment was cancelled and cannot change state.
    #[error("installment is cancelled and cannot be settled")]
    Cancelled,

    /// Settled installments cannot be cancelled.
    #[error("settled installments cannot be cancelled")]
    CannotCancelSettled,

    /// The installment is already cancelled.
    #[error("installment is already cancelled")]
    AlreadyCancelled,

    /// Cancellation requires a non-blank reason.
    #[error("cancellation reason is required")]
    ReasonRequired,

    /// The override amount must be strictly positive.
    #[error("settled amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The override amount carries more than 2 decimal places.
    #[error("settled amount must have at most 2 decimal places, got {0}")]
    TooManyDecimalPlaces(Decimal),

    /// There is no manual override to clear on this installment.
    #[error("installment carries no manual override")]
    NoManualOverride,

    /// A settled installment can no longer have its override cleared.
    #[error("cannot clear a manual override on a settled installment")]
    OverrideLockedBySettlement,

    /// Another writer changed the installment between read and write.
    #[error("installment was modified concurrently, retry the operation")]
    ConcurrentModification,

    /// The backing store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl SettlementError {
    /// Maps this error onto the engine's taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InstallmentNotFound(_) | Self::AgreementNotFound(_) => ErrorKind::NotFound,
            Self::AlreadySettled(_)
            | Self::Cancelled
            | Self::CannotCancelSettled
            | Self::AlreadyCancelled
            | Self::NoManualOverride
            | Self::OverrideLockedBySettlement => ErrorKind::BusinessRule,
            Self::ReasonRequired | Self::NonPositiveAmount(_) | Self::TooManyDecimalPlaces(_) => {
                ErrorKind::Validation
            }
            Self::ConcurrentModification => ErrorKind::Conflict,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InstallmentNotFound(_) => "INSTALLMENT_NOT_FOUND",
            Self::AgreementNotFound(_) => "AGREEMENT_NOT_FOUND",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::Cancelled => "INSTALLMENT_CANCELLED",
            Self::CannotCancelSettled => "CANNOT_CANCEL_SETTLED",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::TooManyDecimalPlaces(_) => "TOO_MANY_DECIMAL_PLACES",
            Self::NoManualOverride => "NO_MANUAL_OVERRIDE",
            Self::OverrideLockedBySettlement => "OVERRIDE_LOCKED_BY_SETTLEMENT",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for SettlementError {
    /// Version conflicts surface as concurrent modification so callers
    /// know a retry can succeed.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => Self::ConcurrentModification,
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_conflict_maps_to_concurrent_modification() {
        let err: SettlementError = StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        }
        .into();
        assert!(matches!(err, SettlementError::ConcurrentModification));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            SettlementError::InstallmentNotFound(InstallmentId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SettlementError::AlreadySettled(InstallmentStatus::Received).kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(SettlementError::ReasonRequired.kind(), ErrorKind::Validation);
        assert_eq!(
            SettlementError::Store(StoreError::Unavailable("down".into())).kind(),
            ErrorKind::Store
        );
    }

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            SettlementError::CannotCancelSettled.to_string(),
            "settled installments cannot be cancelled"
        );
        assert_eq!(
            SettlementError::ReasonRequired.to_string(),
            "cancellation reason is required"
        );
    }
}
