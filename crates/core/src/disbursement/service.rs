//! Client repayment (repasse) workflow.
//!
//! Sub-state machine layered on settled receivable installments:
//! `pendente_declaracao → pendente_transferencia → repassado`. The
//! signed client declaration gates the transfer; money never moves out
//! before it is on file.

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::error::DisbursementError;
use crate::agreement::types::{DisbursementStatus, Installment};
use crate::stores::{AgreementStore, InstallmentFilter, InstallmentPatch};
use lexum_shared::types::{CaseId, DocumentId, InstallmentId, UserId};

/// Input for registering a client-repayment transfer.
#[derive(Debug, Clone)]
pub struct DisbursementInput {
    /// Proof of transfer document.
    pub proof_ref: DocumentId,
    /// User who performed the transfer.
    pub disbursed_by: UserId,
    /// Date the transfer happened.
    pub disbursement_date: NaiveDate,
}

/// Filter for the pending-disbursement queue.
///
/// `nao_aplicavel` and `repassado` installments are never part of the
/// queue; no repasse is owed or it already happened.
#[derive(Debug, Clone, Default)]
pub struct PendingDisbursementFilter {
    /// Restrict to one awaiting state.
    pub status: Option<DisbursementStatus>,
    /// Earliest due date, inclusive.
    pub due_from: Option<NaiveDate>,
    /// Latest due date, inclusive.
    pub due_to: Option<NaiveDate>,
    /// Restrict to installments of agreements on this case.
    pub case_id: Option<CaseId>,
}

/// Walks installments through the disbursement workflow.
pub struct DisbursementService<'a> {
    store: &'a dyn AgreementStore,
}

impl<'a> DisbursementService<'a> {
    /// Creates a service bound to the given store.
    pub fn new(store: &'a dyn AgreementStore) -> Self {
        Self { store }
    }

    /// Attaches the signed client declaration and advances the
    /// installment to `pendente_transferencia`.
    ///
    /// # Errors
    ///
    /// Fails unless the installment is awaiting its declaration.
    pub fn attach_declaration(
        &self,
        installment_id: InstallmentId,
        document_ref: DocumentId,
    ) -> Result<Installment, DisbursementError> {
        let installment = self
            .store
            .get_installment(installment_id)?
            .ok_or(DisbursementError::InstallmentNotFound(installment_id))?;

        match installment.disbursement_status {
            DisbursementStatus::AwaitingDeclaration => {}
            DisbursementStatus::AwaitingTransfer => {
                return Err(DisbursementError::DeclarationAlreadyAttached);
            }
            DisbursementStatus::Disbursed => return Err(DisbursementError::AlreadyDisbursed),
            DisbursementStatus::NotApplicable => return Err(DisbursementError::NotApplicable),
        }

        let patch = InstallmentPatch {
            disbursement_status: Some(DisbursementStatus::AwaitingTransfer),
            declaration_ref: Some(document_ref),
            declared_at: Some(Utc::now()),
            ..InstallmentPatch::default()
        };
        let updated =
            self.store
                .update_installment(installment_id, installment.version, patch)?;
        info!(
            installment_id = %installment_id,
            document = %document_ref,
            "declaration attached"
        );
        Ok(updated)
    }

    /// Registers the client-repayment transfer and completes the
    /// workflow.
    ///
    /// # Errors
    ///
    /// Fails with `"declaration required before disbursement"` when the
    /// declaration was never attached, regardless of the other fields.
    pub fn register_disbursement(
        &self,
        installment_id: InstallmentId,
        input: DisbursementInput,
    ) -> Result<Installment, DisbursementError> {
        let installment = self
            .store
            .get_installment(installment_id)?
            .ok_or(DisbursementError::InstallmentNotFound(installment_id))?;

        match installment.disbursement_status {
            DisbursementStatus::AwaitingTransfer => {}
            DisbursementStatus::AwaitingDeclaration => {
                return Err(DisbursementError::DeclarationRequired);
            }
            DisbursementStatus::Disbursed => return Err(DisbursementError::AlreadyDisbursed),
            DisbursementStatus::NotApplicable => return Err(DisbursementError::NotApplicable),
        }

        let patch = InstallmentPatch {
            disbursement_status: Some(DisbursementStatus::Disbursed),
            disbursement_proof_ref: Some(input.proof_ref),
            disbursement_date: Some(input.disbursement_date),
            disbursed_by: Some(input.disbursed_by),
            ..InstallmentPatch::default()
        };
        let updated =
            self.store
                .update_installment(installment_id, installment.version, patch)?;
        info!(
            installment_id = %installment_id,
            disbursed_by = %input.disbursed_by,
            date = %input.disbursement_date,
            "client repayment disbursed"
        );
        Ok(updated)
    }

    /// Lists installments still owing a client repayment.
    ///
    /// # Errors
    ///
    /// Fails when the filter names a non-queue status or the store is
    /// unavailable.
    pub fn list_pending(
        &self,
        filter: &PendingDisbursementFilter,
    ) -> Result<Vec<Installment>, DisbursementError> {
        let statuses = match filter.status {
            Some(status) if status.is_awaiting() => vec![status],
            Some(status) => return Err(DisbursementError::NotAQueueStatus(status)),
            None => vec![
                DisbursementStatus::AwaitingDeclaration,
                DisbursementStatus::AwaitingTransfer,
            ],
        };

        let installments = self.store.list_installments(&InstallmentFilter {
            statuses: None,
            disbursement_statuses: Some(statuses),
            due_from: filter.due_from,
            due_to: filter.due_to,
            case_id: filter.case_id,
        })?;
        Ok(installments)
    }
}
