//! Error types for statement import and reconciliation.

use lexum_shared::types::{BankTransactionId, LedgerEntryId};
use lexum_shared::{ErrorKind, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by statement import, matching, and link management.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// The bank transaction does not exist.
    #[error("bank transaction not found: {0}")]
    TransactionNotFound(BankTransactionId),

    /// The ledger entry does not exist.
    #[error("ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    /// The transaction already carries an active reconciliation.
    #[error("bank transaction {0} is already reconciled")]
    TransactionAlreadyReconciled(BankTransactionId),

    /// The ledger entry already carries an active reconciliation.
    #[error("ledger entry {0} is already reconciled")]
    EntryAlreadyReconciled(LedgerEntryId),

    /// The ledger entry is cancelled or reversed and cannot be matched.
    #[error("ledger entry {0} is not open for reconciliation")]
    EntryNotOpen(LedgerEntryId),

    /// Unreconcile was asked for a transaction with no active link.
    #[error("bank transaction {0} has no active reconciliation")]
    NoActiveReconciliation(BankTransactionId),

    /// The imported statement contains no lines.
    #[error("statement has no lines")]
    EmptyStatement,

    /// A statement line carries a zero or negative amount.
    #[error("statement line {line}: amount must be positive, got {amount}")]
    NonPositiveLineAmount {
        /// One-based line number in the statement.
        line: usize,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A statement line carries an amount with more than 2 decimal places.
    #[error("statement line {line}: amount {amount} has more than 2 decimal places")]
    LineAmountScale {
        /// One-based line number in the statement.
        line: usize,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A statement line has a blank description.
    #[error("statement line {line}: description must not be blank")]
    BlankLineDescription {
        /// One-based line number in the statement.
        line: usize,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReconciliationError {
    /// Maps this error onto the engine's taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransactionNotFound(_) | Self::EntryNotFound(_) => ErrorKind::NotFound,
            Self::TransactionAlreadyReconciled(_) | Self::EntryAlreadyReconciled(_) => {
                ErrorKind::Conflict
            }
            Self::EntryNotOpen(_) | Self::NoActiveReconciliation(_) => ErrorKind::BusinessRule,
            Self::EmptyStatement
            | Self::NonPositiveLineAmount { .. }
            | Self::LineAmountScale { .. }
            | Self::BlankLineDescription { .. } => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::TransactionAlreadyReconciled(_) => "TRANSACTION_ALREADY_RECONCILED",
            Self::EntryAlreadyReconciled(_) => "ENTRY_ALREADY_RECONCILED",
            Self::EntryNotOpen(_) => "ENTRY_NOT_OPEN",
            Self::NoActiveReconciliation(_) => "NO_ACTIVE_RECONCILIATION",
            Self::EmptyStatement => "EMPTY_STATEMENT",
            Self::NonPositiveLineAmount { .. } => "NON_POSITIVE_LINE_AMOUNT",
            Self::LineAmountScale { .. } => "LINE_AMOUNT_SCALE",
            Self::BlankLineDescription { .. } => "BLANK_LINE_DESCRIPTION",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}
