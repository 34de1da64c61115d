//! Installment → ledger entry synchronization.
//!
//! Materializes one ledger entry per non-cancelled installment of an
//! agreement and keeps it aligned as installments move through their
//! lifecycle. Entries of cancelled installments are marked cancelled so
//! the ledger never drifts when a schedule line is dropped.

use tracing::info;

use super::error::LedgerSyncError;
use super::types::{EntryDirection, EntryStatus, LedgerEntryFields};
use crate::agreement::types::{Agreement, AgreementDirection, Installment, InstallmentStatus};
use crate::stores::{AgreementStore, LedgerStore};
use lexum_shared::types::AgreementId;

/// Outcome counts of one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries created or updated for live installments.
    pub synced: usize,
    /// Entries of cancelled installments marked cancelled.
    pub cancelled: usize,
    /// Cancelled installments that never had an entry; nothing to do.
    pub skipped: usize,
}

/// Projects agreements into the financial ledger.
pub struct LedgerSyncService<'a> {
    agreements: &'a dyn AgreementStore,
    ledger: &'a dyn LedgerStore,
}

impl<'a> LedgerSyncService<'a> {
    /// Creates a service bound to the given stores.
    pub fn new(agreements: &'a dyn AgreementStore, ledger: &'a dyn LedgerStore) -> Self {
        Self { agreements, ledger }
    }

    /// Synchronizes every installment of an agreement into the ledger.
    ///
    /// Live installments get an upserted entry carrying the gross
    /// principal, the agreement's direction, and a status mirroring the
    /// settlement state. Runs sequentially inside one logical store
    /// batch.
    ///
    /// # Errors
    ///
    /// Fails when the agreement does not exist or the store fails; a
    /// store failure aborts the pass.
    pub fn sync_agreement(&self, agreement_id: AgreementId) -> Result<SyncReport, LedgerSyncError> {
        let agreement = self
            .agreements
            .get_agreement(agreement_id)?
            .ok_or(LedgerSyncError::AgreementNotFound(agreement_id))?;
        let installments = self.agreements.get_installments_by_agreement(agreement_id)?;

        let mut report = SyncReport::default();
        for installment in &installments {
            if installment.status == InstallmentStatus::Cancelled {
                // Only mark an entry that actually exists; a cancelled
                // line that was never synchronized needs no tombstone.
                match self.ledger.find_entry_by_installment(installment.id)? {
                    Some(_) => {
                        let mut fields = entry_fields(&agreement, installment);
                        fields.status = EntryStatus::Cancelled;
                        self.ledger
                            .upsert_entry_for_installment(installment.id, fields)?;
                        report.cancelled += 1;
                    }
                    None => report.skipped += 1,
                }
            } else {
                self.ledger.upsert_entry_for_installment(
                    installment.id,
                    entry_fields(&agreement, installment),
                )?;
                report.synced += 1;
            }
        }

        info!(
            agreement_id = %agreement_id,
            synced = report.synced,
            cancelled = report.cancelled,
            "agreement synchronized into ledger"
        );
        Ok(report)
    }
}

/// Ledger projection of one installment.
fn entry_fields(agreement: &Agreement, installment: &Installment) -> LedgerEntryFields {
    let settled = installment.status.is_settled();
    LedgerEntryFields {
        description: format!(
            "Parcela {}/{} - caso {}",
            installment.sequence, agreement.installment_count, agreement.case_id
        ),
        due_date: installment.due_date,
        effective_date: if settled {
            installment.settlement_date
        } else {
            None
        },
        amount: installment.gross_principal,
        direction: match agreement.direction {
            AgreementDirection::Receivable => EntryDirection::Revenue,
            AgreementDirection::Payable => EntryDirection::Expense,
        },
        status: if settled {
            EntryStatus::Confirmed
        } else {
            EntryStatus::Pending
        },
    }
}
