//! Storage contracts the engine is written against.
//!
//! Persistence technology lives outside the engine: every service takes
//! these traits as injected dependencies and never reaches for a global
//! connection. The contracts are synchronous; an async backend adapts at
//! the embedding boundary. Batch methods are single logical transactions
//! and implementations must honor that atomically.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::agreement::types::{
    Agreement, DisbursementStatus, Installment, InstallmentStatus, PaymentMethod,
};
use crate::ledger_sync::types::{LedgerEntry, LedgerEntryFields};
use crate::reconciliation::types::{BankTransaction, Reconciliation, ReconciliationStatus};
use chrono::{DateTime, Utc};
use lexum_shared::types::{
    AgreementId, BankTransactionId, CaseId, DocumentId, InstallmentId, LedgerEntryId, UserId,
};
use lexum_shared::StoreError;

/// Partial update applied to a single installment.
///
/// `None` fields are left untouched. Fields that are optional on the
/// installment itself are only ever set, never cleared, by the engine's
/// operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallmentPatch {
    /// New stored status.
    pub status: Option<InstallmentStatus>,
    /// Settlement date to record.
    pub settlement_date: Option<NaiveDate>,
    /// Payment method to record.
    pub payment_method: Option<PaymentMethod>,
    /// Override for the gross principal.
    pub gross_principal: Option<Decimal>,
    /// Re-derived contractual fee.
    pub contractual_fee: Option<Decimal>,
    /// Re-derived client repayment.
    pub client_repayment: Option<Decimal>,
    /// New disbursement workflow state.
    pub disbursement_status: Option<DisbursementStatus>,
    /// Manual-edit flag.
    pub manually_edited: Option<bool>,
    /// Audit reason recorded on cancellation.
    pub cancellation_reason: Option<String>,
    /// Declaration document reference.
    pub declaration_ref: Option<DocumentId>,
    /// Declaration attachment timestamp.
    pub declared_at: Option<DateTime<Utc>>,
    /// Disbursement proof reference.
    pub disbursement_proof_ref: Option<DocumentId>,
    /// Date of the client-repayment transfer.
    pub disbursement_date: Option<NaiveDate>,
    /// User who registered the disbursement.
    pub disbursed_by: Option<UserId>,
}

/// Filter for installment listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallmentFilter {
    /// Restrict to these stored statuses.
    pub statuses: Option<Vec<InstallmentStatus>>,
    /// Restrict to these disbursement states.
    pub disbursement_statuses: Option<Vec<DisbursementStatus>>,
    /// Earliest due date, inclusive.
    pub due_from: Option<NaiveDate>,
    /// Latest due date, inclusive.
    pub due_to: Option<NaiveDate>,
    /// Restrict to installments of agreements on this case.
    pub case_id: Option<CaseId>,
}

/// Filter for open (unreconciled) ledger entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenEntryFilter {
    /// Earliest entry date, inclusive. Matches the effective date when
    /// set, the due date otherwise.
    pub date_from: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    pub date_to: Option<NaiveDate>,
}

/// Filter for pending bank transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Earliest transaction date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest transaction date, inclusive.
    pub date_to: Option<NaiveDate>,
}

/// Result of an attempt to create a reconciliation link.
///
/// The uniqueness check is part of the same atomic operation as the
/// insert, so two racing callers cannot both link the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was created and both sides were marked reconciled.
    Created,
    /// The transaction already has an active reconciliation.
    TransactionAlreadyLinked,
    /// The ledger entry already has an active reconciliation.
    EntryAlreadyLinked,
}

/// Store for agreements and their installments.
#[cfg_attr(test, mockall::automock)]
pub trait AgreementStore {
    /// Persists a new agreement.
    fn create_agreement(&self, agreement: Agreement) -> Result<(), StoreError>;

    /// Loads an agreement by id.
    fn get_agreement(&self, id: AgreementId) -> Result<Option<Agreement>, StoreError>;

    /// Persists a batch of installments, all-or-nothing: either every
    /// row is written or none is.
    fn create_installments(&self, batch: Vec<Installment>) -> Result<(), StoreError>;

    /// Loads an installment by id.
    fn get_installment(&self, id: InstallmentId) -> Result<Option<Installment>, StoreError>;

    /// Lists the installments of an agreement, ordered by sequence.
    fn get_installments_by_agreement(
        &self,
        agreement_id: AgreementId,
    ) -> Result<Vec<Installment>, StoreError>;

    /// Applies a partial update under the optimistic version check.
    ///
    /// Fails with [`StoreError::VersionConflict`] when the stored version
    /// no longer matches `expected_version`, and bumps the version on
    /// success. Returns the updated installment.
    fn update_installment(
        &self,
        id: InstallmentId,
        expected_version: i64,
        patch: InstallmentPatch,
    ) -> Result<Installment, StoreError>;

    /// Deletes every installment of an agreement, returning the count.
    fn delete_installments_by_agreement(
        &self,
        agreement_id: AgreementId,
    ) -> Result<usize, StoreError>;

    /// Lists installments across agreements matching the filter.
    fn list_installments(&self, filter: &InstallmentFilter) -> Result<Vec<Installment>, StoreError>;
}

/// Store for the financial subsystem's ledger entries.
///
/// The ledger is independently owned; the engine only touches entries
/// through this contract.
#[cfg_attr(test, mockall::automock)]
pub trait LedgerStore {
    /// Creates or updates the entry linked to an installment.
    fn upsert_entry_for_installment(
        &self,
        installment_id: InstallmentId,
        fields: LedgerEntryFields,
    ) -> Result<LedgerEntry, StoreError>;

    /// Finds the entry linked to an installment, if any.
    fn find_entry_by_installment(
        &self,
        installment_id: InstallmentId,
    ) -> Result<Option<LedgerEntry>, StoreError>;

    /// Loads an entry by id.
    fn get_entry(&self, id: LedgerEntryId) -> Result<Option<LedgerEntry>, StoreError>;

    /// Lists entries open for reconciliation (active status, not yet
    /// reconciled), optionally date-bounded.
    fn list_open_entries(&self, filter: &OpenEntryFilter) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Lists every entry carrying an installment reference, for orphan
    /// detection.
    fn list_installment_linked_entries(&self) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// Store for imported bank transactions and reconciliation links.
#[cfg_attr(test, mockall::automock)]
pub trait BankTransactionStore {
    /// Persists a batch of imported transactions, all-or-nothing.
    fn create_transactions(&self, batch: Vec<BankTransaction>) -> Result<(), StoreError>;

    /// Loads a transaction by id.
    fn get_transaction(
        &self,
        id: BankTransactionId,
    ) -> Result<Option<BankTransaction>, StoreError>;

    /// Lists transactions still awaiting reconciliation (pending or
    /// suggested).
    fn list_pending_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<BankTransaction>, StoreError>;

    /// Creates a reconciliation link.
    ///
    /// The at-most-one-active-link check per side runs atomically with
    /// the insert. On success the transaction is marked reconciled and
    /// the ledger entry is flagged as reconciled in the same operation.
    fn create_reconciliation(&self, link: Reconciliation) -> Result<LinkOutcome, StoreError>;

    /// Finds the active reconciliation of a transaction, if any.
    fn find_reconciliation_by_transaction(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Option<Reconciliation>, StoreError>;

    /// Removes the active reconciliation of a transaction, returning it.
    ///
    /// Both sides go back to pending/open in the same operation. Returns
    /// `None` when no active link exists.
    fn delete_reconciliation(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Option<Reconciliation>, StoreError>;

    /// Updates a transaction's reconciliation status (used to mark
    /// below-threshold candidates as suggested).
    fn set_transaction_status(
        &self,
        id: BankTransactionId,
        status: ReconciliationStatus,
    ) -> Result<(), StoreError>;
}
