//! Thread-safe in-memory store.
//!
//! Backs the engine's three store contracts with wire-format records
//! behind a single `RwLock`, which makes every batch write and the
//! reconciliation check-and-insert naturally atomic. Intended for tests
//! and embedding scenarios that do not need durability.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uuid::Uuid;

use crate::record::{
    AgreementRecord, BankTransactionRecord, InstallmentRecord, LedgerEntryRecord,
    ReconciliationRecord,
};
use lexum_core::agreement::types::{Agreement, Installment};
use lexum_core::ledger_sync::types::{LedgerEntry, LedgerEntryFields};
use lexum_core::reconciliation::types::{BankTransaction, Reconciliation, ReconciliationStatus};
use lexum_core::stores::{
    AgreementStore, BankTransactionStore, InstallmentFilter, InstallmentPatch, LedgerStore,
    LinkOutcome, OpenEntryFilter, TransactionFilter,
};
use lexum_shared::types::{
    AgreementId, BankTransactionId, InstallmentId, LedgerEntryId,
};
use lexum_shared::StoreError;

#[derive(Default)]
struct State {
    agreements: HashMap<Uuid, AgreementRecord>,
    installments: HashMap<Uuid, InstallmentRecord>,
    entries: HashMap<Uuid, LedgerEntryRecord>,
    transactions: HashMap<Uuid, BankTransactionRecord>,
    reconciliations: HashMap<Uuid, ReconciliationRecord>,
}

/// In-memory implementation of all three store contracts.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

fn apply_patch(installment: &mut Installment, patch: InstallmentPatch) {
    if let Some(status) = patch.status {
        installment.status = status;
    }
    if let Some(settlement_date) = patch.settlement_date {
        installment.settlement_date = Some(settlement_date);
    }
    if let Some(payment_method) = patch.payment_method {
        installment.payment_method = Some(payment_method);
    }
    if let Some(gross_principal) = patch.gross_principal {
        installment.gross_principal = gross_principal;
    }
    if let Some(contractual_fee) = patch.contractual_fee {
        installment.contractual_fee = contractual_fee;
    }
    if let Some(client_repayment) = patch.client_repayment {
        installment.client_repayment = client_repayment;
    }
    if let Some(disbursement_status) = patch.disbursement_status {
        installment.disbursement_status = disbursement_status;
    }
    if let Some(manually_edited) = patch.manually_edited {
        installment.manually_edited = manually_edited;
    }
    if let Some(cancellation_reason) = patch.cancellation_reason {
        installment.cancellation_reason = Some(cancellation_reason);
    }
    if let Some(declaration_ref) = patch.declaration_ref {
        installment.declaration_ref = Some(declaration_ref);
    }
    if let Some(declared_at) = patch.declared_at {
        installment.declared_at = Some(declared_at);
    }
    if let Some(disbursement_proof_ref) = patch.disbursement_proof_ref {
        installment.disbursement_proof_ref = Some(disbursement_proof_ref);
    }
    if let Some(disbursement_date) = patch.disbursement_date {
        installment.disbursement_date = Some(disbursement_date);
    }
    if let Some(disbursed_by) = patch.disbursed_by {
        installment.disbursed_by = Some(disbursed_by);
    }
}

impl AgreementStore for MemoryStore {
    fn create_agreement(&self, agreement: Agreement) -> Result<(), StoreError> {
        let mut state = self.write()?;
        debug!(agreement_id = %agreement.id, "storing agreement");
        state
            .agreements
            .insert(agreement.id.into_inner(), AgreementRecord::from(&agreement));
        Ok(())
    }

    fn get_agreement(&self, id: AgreementId) -> Result<Option<Agreement>, StoreError> {
        let state = self.read()?;
        state
            .agreements
            .get(&id.into_inner())
            .cloned()
            .map(Agreement::try_from)
            .transpose()
    }

    fn create_installments(&self, batch: Vec<Installment>) -> Result<(), StoreError> {
        let mut state = self.write()?;
        debug!(count = batch.len(), "storing installment batch");
        for installment in &batch {
            state
                .installments
                .insert(installment.id.into_inner(), InstallmentRecord::from(installment));
        }
        Ok(())
    }

    fn get_installment(&self, id: InstallmentId) -> Result<Option<Installment>, StoreError> {
        let state = self.read()?;
        state
            .installments
            .get(&id.into_inner())
            .cloned()
            .map(Installment::try_from)
            .transpose()
    }

    fn get_installments_by_agreement(
        &self,
        agreement_id: AgreementId,
    ) -> Result<Vec<Installment>, StoreError> {
        let state = self.read()?;
        let mut installments = state
            .installments
            .values()
            .filter(|record| record.agreement_id == agreement_id.into_inner())
            .cloned()
            .map(Installment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        installments.sort_by_key(|installment| installment.sequence);
        Ok(installments)
    }

    fn update_installment(
        &self,
        id: InstallmentId,
        expected_version: i64,
        patch: InstallmentPatch,
    ) -> Result<Installment, StoreError> {
        let mut state = self.write()?;
        let record = state
            .installments
            .get(&id.into_inner())
            .cloned()
            .ok_or(StoreError::RecordVanished)?;
        let mut installment = Installment::try_from(record)?;
        if installment.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: installment.version,
            });
        }
        apply_patch(&mut installment, patch);
        installment.version += 1;
        state
            .installments
            .insert(id.into_inner(), InstallmentRecord::from(&installment));
        Ok(installment)
    }

    fn delete_installments_by_agreement(
        &self,
        agreement_id: AgreementId,
    ) -> Result<usize, StoreError> {
        let mut state = self.write()?;
        let before = state.installments.len();
        state
            .installments
            .retain(|_, record| record.agreement_id != agreement_id.into_inner());
        let removed = before - state.installments.len();
        debug!(agreement_id = %agreement_id, removed, "deleted installments");
        Ok(removed)
    }

    fn list_installments(
        &self,
        filter: &InstallmentFilter,
    ) -> Result<Vec<Installment>, StoreError> {
        let state = self.read()?;
        let case_agreements: Option<Vec<Uuid>> = filter.case_id.map(|case_id| {
            state
                .agreements
                .values()
                .filter(|record| record.case_id == case_id.into_inner())
                .map(|record| record.id)
                .collect()
        });

        let mut installments = Vec::new();
        for record in state.installments.values() {
            if let Some(agreement_ids) = &case_agreements {
                if !agreement_ids.contains(&record.agreement_id) {
                    continue;
                }
            }
            let installment = Installment::try_from(record.clone())?;
            if let Some(statuses) = &filter.statuses {
                if !statuses.contains(&installment.status) {
                    continue;
                }
            }
            if let Some(disbursement_statuses) = &filter.disbursement_statuses {
                if !disbursement_statuses.contains(&installment.disbursement_status) {
                    continue;
                }
            }
            if let Some(from) = filter.due_from {
                if installment.due_date < from {
                    continue;
                }
            }
            if let Some(to) = filter.due_to {
                if installment.due_date > to {
                    continue;
                }
            }
            installments.push(installment);
        }
        installments.sort_by_key(|installment| (installment.due_date, installment.sequence));
        Ok(installments)
    }
}

impl LedgerStore for MemoryStore {
    fn upsert_entry_for_installment(
        &self,
        installment_id: InstallmentId,
        fields: LedgerEntryFields,
    ) -> Result<LedgerEntry, StoreError> {
        let mut state = self.write()?;
        let existing = state
            .entries
            .values()
            .find(|record| record.installment_id == Some(installment_id.into_inner()))
            .cloned();
        let entry = match existing {
            Some(record) => {
                let mut entry = LedgerEntry::try_from(record)?;
                entry.description = fields.description;
                entry.due_date = fields.due_date;
                entry.effective_date = fields.effective_date;
                entry.amount = fields.amount;
                entry.direction = fields.direction;
                entry.status = fields.status;
                entry
            }
            None => LedgerEntry {
                id: LedgerEntryId::new(),
                installment_id: Some(installment_id),
                description: fields.description,
                due_date: fields.due_date,
                effective_date: fields.effective_date,
                amount: fields.amount,
                direction: fields.direction,
                status: fields.status,
                reconciled: false,
            },
        };
        state
            .entries
            .insert(entry.id.into_inner(), LedgerEntryRecord::from(&entry));
        Ok(entry)
    }

    fn find_entry_by_installment(
        &self,
        installment_id: InstallmentId,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let state = self.read()?;
        state
            .entries
            .values()
            .find(|record| record.installment_id == Some(installment_id.into_inner()))
            .cloned()
            .map(LedgerEntry::try_from)
            .transpose()
    }

    fn get_entry(&self, id: LedgerEntryId) -> Result<Option<LedgerEntry>, StoreError> {
        let state = self.read()?;
        state
            .entries
            .get(&id.into_inner())
            .cloned()
            .map(LedgerEntry::try_from)
            .transpose()
    }

    fn list_open_entries(&self, filter: &OpenEntryFilter) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.read()?;
        let mut entries = Vec::new();
        for record in state.entries.values() {
            let entry = LedgerEntry::try_from(record.clone())?;
            if !entry.status.is_active() || entry.reconciled {
                continue;
            }
            let date = entry.matching_date();
            if let Some(from) = filter.date_from {
                if date < from {
                    continue;
                }
            }
            if let Some(to) = filter.date_to {
                if date > to {
                    continue;
                }
            }
            entries.push(entry);
        }
        entries.sort_by_key(|entry| (entry.matching_date(), entry.id));
        Ok(entries)
    }

    fn list_installment_linked_entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.read()?;
        let mut entries = state
            .entries
            .values()
            .filter(|record| record.installment_id.is_some())
            .cloned()
            .map(LedgerEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }
}

impl BankTransactionStore for MemoryStore {
    fn create_transactions(&self, batch: Vec<BankTransaction>) -> Result<(), StoreError> {
        let mut state = self.write()?;
        debug!(count = batch.len(), "storing transaction batch");
        for transaction in &batch {
            state.transactions.insert(
                transaction.id.into_inner(),
                BankTransactionRecord::from(transaction),
            );
        }
        Ok(())
    }

    fn get_transaction(
        &self,
        id: BankTransactionId,
    ) -> Result<Option<BankTransaction>, StoreError> {
        let state = self.read()?;
        state
            .transactions
            .get(&id.into_inner())
            .cloned()
            .map(BankTransaction::try_from)
            .transpose()
    }

    fn list_pending_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<BankTransaction>, StoreError> {
        let state = self.read()?;
        let mut transactions = Vec::new();
        for record in state.transactions.values() {
            let transaction = BankTransaction::try_from(record.clone())?;
            if transaction.status == ReconciliationStatus::Reconciled {
                continue;
            }
            if let Some(from) = filter.date_from {
                if transaction.date < from {
                    continue;
                }
            }
            if let Some(to) = filter.date_to {
                if transaction.date > to {
                    continue;
                }
            }
            transactions.push(transaction);
        }
        transactions.sort_by_key(|transaction| (transaction.date, transaction.id));
        Ok(transactions)
    }

    fn create_reconciliation(&self, link: Reconciliation) -> Result<LinkOutcome, StoreError> {
        let mut state = self.write()?;
        if state
            .reconciliations
            .values()
            .any(|record| record.transaction_id == link.transaction_id.into_inner())
        {
            return Ok(LinkOutcome::TransactionAlreadyLinked);
        }
        if state
            .reconciliations
            .values()
            .any(|record| record.entry_id == link.entry_id.into_inner())
        {
            return Ok(LinkOutcome::EntryAlreadyLinked);
        }
        if !state
            .transactions
            .contains_key(&link.transaction_id.into_inner())
            || !state.entries.contains_key(&link.entry_id.into_inner())
        {
            return Err(StoreError::RecordVanished);
        }

        // Both sides flip inside the same write lock as the insert.
        if let Some(transaction) = state
            .transactions
            .get_mut(&link.transaction_id.into_inner())
        {
            transaction.status = ReconciliationStatus::Reconciled.as_str().to_string();
        }
        if let Some(entry) = state.entries.get_mut(&link.entry_id.into_inner()) {
            entry.reconciled = true;
        }
        debug!(
            transaction_id = %link.transaction_id,
            entry_id = %link.entry_id,
            "reconciliation link created"
        );
        state
            .reconciliations
            .insert(link.id.into_inner(), ReconciliationRecord::from(&link));
        Ok(LinkOutcome::Created)
    }

    fn find_reconciliation_by_transaction(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Option<Reconciliation>, StoreError> {
        let state = self.read()?;
        state
            .reconciliations
            .values()
            .find(|record| record.transaction_id == transaction_id.into_inner())
            .cloned()
            .map(Reconciliation::try_from)
            .transpose()
    }

    fn delete_reconciliation(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Option<Reconciliation>, StoreError> {
        let mut state = self.write()?;
        let Some(link_id) = state
            .reconciliations
            .values()
            .find(|record| record.transaction_id == transaction_id.into_inner())
            .map(|record| record.id)
        else {
            return Ok(None);
        };
        let Some(record) = state.reconciliations.remove(&link_id) else {
            return Ok(None);
        };
        let link = Reconciliation::try_from(record)?;

        if let Some(transaction) = state
            .transactions
            .get_mut(&link.transaction_id.into_inner())
        {
            transaction.status = ReconciliationStatus::Pending.as_str().to_string();
        }
        if let Some(entry) = state.entries.get_mut(&link.entry_id.into_inner()) {
            entry.reconciled = false;
        }
        debug!(
            transaction_id = %link.transaction_id,
            entry_id = %link.entry_id,
            "reconciliation link removed"
        );
        Ok(Some(link))
    }

    fn set_transaction_status(
        &self,
        id: BankTransactionId,
        status: ReconciliationStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let record = state
            .transactions
            .get_mut(&id.into_inner())
            .ok_or(StoreError::RecordVanished)?;
        record.status = status.as_str().to_string();
        Ok(())
    }
}
