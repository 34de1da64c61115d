//! Error types for the disbursement workflow.

use lexum_shared::types::InstallmentId;
use lexum_shared::{ErrorKind, StoreError};
use thiserror::Error;

use crate::agreement::types::DisbursementStatus;

/// Errors raised while walking an installment through the client
/// repayment workflow.
#[derive(Debug, Error)]
pub enum DisbursementError {
    /// The installment does not exist.
    #[error("installment not found: {0}")]
    InstallmentNotFound(InstallmentId),

    /// A transfer cannot be registered before the signed declaration is
    /// on file. Pinned, user-displayable message.
    #[error("declaration required before disbursement")]
    DeclarationRequired,

    /// No client repayment is owed on this installment.
    #[error("no client repayment is owed on this installment")]
    NotApplicable,

    /// The client repayment was already transferred.
    #[error("installment already disbursed")]
    AlreadyDisbursed,

    /// The declaration was already attached.
    #[error("declaration already attached, awaiting transfer")]
    DeclarationAlreadyAttached,

    /// The pending queue only covers awaiting states.
    #[error("pending queue filter only accepts awaiting statuses, got {0}")]
    NotAQueueStatus(DisbursementStatus),

    /// Another writer changed the installment between read and write.
    #[error("installment was modified concurrently, retry the operation")]
    ConcurrentModification,

    /// The backing store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl DisbursementError {
    /// Maps this error onto the engine's taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InstallmentNotFound(_) => ErrorKind::NotFound,
            Self::DeclarationRequired
            | Self::NotApplicable
            | Self::AlreadyDisbursed
            | Self::DeclarationAlreadyAttached => ErrorKind::BusinessRule,
            Self::NotAQueueStatus(_) => ErrorKind::Validation,
            Self::ConcurrentModification => ErrorKind::Conflict,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InstallmentNotFound(_) => "INSTALLMENT_NOT_FOUND",
            Self::DeclarationRequired => "DECLARATION_REQUIRED",
            Self::NotApplicable => "DISBURSEMENT_NOT_APPLICABLE",
            Self::AlreadyDisbursed => "ALREADY_DISBURSED",
            Self::DeclarationAlreadyAttached => "DECLARATION_ALREADY_ATTACHED",
            Self::NotAQueueStatus(_) => "NOT_A_QUEUE_STATUS",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for DisbursementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => Self::ConcurrentModification,
            other => Self::Store(other),
        }
    }
}
