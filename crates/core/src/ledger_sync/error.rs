//! Error types for ledger synchronization and the consistency audit.

use lexum_shared::types::AgreementId;
use lexum_shared::{ErrorKind, StoreError};
use thiserror::Error;

/// Errors raised while projecting installments into the ledger or
/// auditing the two against each other.
#[derive(Debug, Error)]
pub enum LedgerSyncError {
    /// The agreement does not exist.
    #[error("agreement not found: {0}")]
    AgreementNotFound(AgreementId),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerSyncError {
    /// Maps this error onto the engine's taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AgreementNotFound(_) => ErrorKind::NotFound,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AgreementNotFound(_) => "AGREEMENT_NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
