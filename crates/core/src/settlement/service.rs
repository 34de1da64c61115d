//! Settlement state transitions.
//!
//! Marks installments received/paid, cancels them, and clears manual
//! overrides. Every mutation re-reads the installment and writes through
//! the optimistic version check, so two racing writers cannot both
//! succeed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::SettlementError;
use crate::agreement::types::{
    AgreementDirection, DisbursementStatus, Installment, InstallmentStatus, PaymentMethod,
};
use crate::distribution::split::SplitCalculator;
use crate::stores::{AgreementStore, InstallmentPatch};
use lexum_shared::types::InstallmentId;

/// Input for settling an installment.
#[derive(Debug, Clone)]
pub struct SettleInput {
    /// The date money actually moved.
    pub settlement_date: NaiveDate,
    /// How the settlement was paid.
    pub payment_method: PaymentMethod,
    /// Actual amount received/paid when it differs from the scheduled
    /// principal. Recorded as a manual edit.
    pub actual_amount: Option<Decimal>,
    /// Re-derive the fee and client repayment from the actual amount.
    /// Off by default: an override records what happened without
    /// silently recomputing the split.
    pub recompute_split: bool,
}

/// Settles, cancels, and un-overrides installments.
pub struct SettlementService<'a> {
    store: &'a dyn AgreementStore,
}

impl<'a> SettlementService<'a> {
    /// Creates a service bound to the given store.
    pub fn new(store: &'a dyn AgreementStore) -> Self {
        Self { store }
    }

    /// Marks an installment settled.
    ///
    /// The stored status follows the agreement direction: receivables
    /// become `recebida`, payables become `paga`. Receivables still owing
    /// a client repayment enter the disbursement queue
    /// (`pendente_declaracao`); everything else is `nao_aplicavel`.
    ///
    /// # Errors
    ///
    /// Fails when the installment is missing, already settled, or
    /// cancelled; on invalid override amounts; and with a conflict when a
    /// concurrent writer got there first.
    pub fn settle(
        &self,
        installment_id: InstallmentId,
        input: SettleInput,
    ) -> Result<Installment, SettlementError> {
        let installment = self
            .store
            .get_installment(installment_id)?
            .ok_or(SettlementError::InstallmentNotFound(installment_id))?;

        match installment.status {
            InstallmentStatus::Pending => {}
            InstallmentStatus::Received | InstallmentStatus::Paid => {
                return Err(SettlementError::AlreadySettled(installment.status));
            }
            InstallmentStatus::Cancelled => return Err(SettlementError::Cancelled),
        }

        let agreement = self
            .store
            .get_agreement(installment.agreement_id)?
            .ok_or(SettlementError::AgreementNotFound(installment.agreement_id))?;

        if let Some(amount) = input.actual_amount {
            if amount <= Decimal::ZERO {
                return Err(SettlementError::NonPositiveAmount(amount));
            }
            if amount.normalize().scale() > 2 {
                return Err(SettlementError::TooManyDecimalPlaces(amount));
            }
        }

        let principal = input.actual_amount.unwrap_or(installment.gross_principal);
        let mut patch = InstallmentPatch {
            status: Some(match agreement.direction {
                AgreementDirection::Receivable => InstallmentStatus::Received,
                AgreementDirection::Payable => InstallmentStatus::Paid,
            }),
            settlement_date: Some(input.settlement_date),
            payment_method: Some(input.payment_method),
            ..InstallmentPatch::default()
        };

        if input.actual_amount.is_some() {
            patch.gross_principal = Some(principal);
            patch.manually_edited = Some(true);
        }

        let client_repayment = if input.recompute_split {
            let outcome = SplitCalculator::split(
                principal,
                installment.success_fee,
                agreement.office_percent,
            )
            .map_err(|_| SettlementError::NonPositiveAmount(principal))?;
            let client = principal - outcome.contractual_fee - installment.success_fee;
            patch.contractual_fee = Some(outcome.contractual_fee);
            patch.client_repayment = Some(client);
            client
        } else {
            installment.client_repayment
        };

        patch.disbursement_status = Some(
            if agreement.direction == AgreementDirection::Receivable
                && client_repayment > Decimal::ZERO
            {
                DisbursementStatus::AwaitingDeclaration
            } else {
                DisbursementStatus::NotApplicable
            },
        );

        let updated =
            self.store
                .update_installment(installment_id, installment.version, patch)?;
        info!(
            installment_id = %installment_id,
            agreement_id = %installment.agreement_id,
            status = %updated.status,
            overridden = input.actual_amount.is_some(),
            "installment settled"
        );
        Ok(updated)
    }

    /// Cancels an installment with a mandatory audit reason.
    ///
    /// # Errors
    ///
    /// Fails on a blank reason, on settled or already-cancelled
    /// installments, and on concurrent modification.
    pub fn cancel(
        &self,
        installment_id: InstallmentId,
        reason: &str,
    ) -> Result<Installment, SettlementError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SettlementError::ReasonRequired);
        }

        let installment = self
            .store
            .get_installment(installment_id)?
            .ok_or(SettlementError::InstallmentNotFound(installment_id))?;

        match installment.status {
            InstallmentStatus::Received | InstallmentStatus::Paid => {
                return Err(SettlementError::CannotCancelSettled);
            }
            InstallmentStatus::Cancelled => return Err(SettlementError::AlreadyCancelled),
            InstallmentStatus::Pending => {}
        }

        let patch = InstallmentPatch {
            status: Some(InstallmentStatus::Cancelled),
            cancellation_reason: Some(reason.to_string()),
            ..InstallmentPatch::default()
        };
        let updated =
            self.store
                .update_installment(installment_id, installment.version, patch)?;
        warn!(installment_id = %installment_id, reason, "installment cancelled");
        Ok(updated)
    }

    /// Clears a manual override, re-deriving the split from the
    /// agreement's office percent over the installment's current gross
    /// principal.
    ///
    /// # Errors
    ///
    /// Fails when no override is set or when the installment is already
    /// settled.
    pub fn clear_manual_override(
        &self,
        installment_id: InstallmentId,
    ) -> Result<Installment, SettlementError> {
        let installment = self
            .store
            .get_installment(installment_id)?
            .ok_or(SettlementError::InstallmentNotFound(installment_id))?;

        if installment.status.is_settled() {
            return Err(SettlementError::OverrideLockedBySettlement);
        }
        if !installment.manually_edited {
            return Err(SettlementError::NoManualOverride);
        }

        let agreement = self
            .store
            .get_agreement(installment.agreement_id)?
            .ok_or(SettlementError::AgreementNotFound(installment.agreement_id))?;

        let outcome = SplitCalculator::split(
            installment.gross_principal,
            installment.success_fee,
            agreement.office_percent,
        )
        .map_err(|_| SettlementError::NonPositiveAmount(installment.gross_principal))?;

        let patch = InstallmentPatch {
            contractual_fee: Some(outcome.contractual_fee),
            client_repayment: Some(
                installment.gross_principal - outcome.contractual_fee - installment.success_fee,
            ),
            manually_edited: Some(false),
            ..InstallmentPatch::default()
        };
        let updated =
            self.store
                .update_installment(installment_id, installment.version, patch)?;
        info!(installment_id = %installment_id, "manual override cleared");
        Ok(updated)
    }
}
