//! Agreement creation and distribution recalculation.
//!
//! Orchestrates the pure generator against the agreement store. Both
//! operations are validate-then-act: every guard runs before the first
//! write, so a failure never leaves a partial installment set behind.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::DistributionError;
use super::generator::{self, InstallmentDraft};
use crate::agreement::types::{
    Agreement, AgreementDirection, AgreementKind, DisbursementStatus, DistributionMode,
    Installment, InstallmentStatus, RecurrenceInterval,
};
use crate::stores::AgreementStore;
use chrono::NaiveDate;
use lexum_shared::types::{AgreementId, CaseId, InstallmentId};

/// Input for creating an agreement and its installment schedule.
#[derive(Debug, Clone)]
pub struct CreateAgreementInput {
    /// The legal case this obligation belongs to.
    pub case_id: CaseId,
    /// Legal nature of the obligation.
    pub kind: AgreementKind,
    /// Whether the office receives or pays.
    pub direction: AgreementDirection,
    /// Total agreed value.
    pub total_value: Decimal,
    /// Number of installments.
    pub installment_count: u32,
    /// Due date of the first installment.
    pub first_due_date: NaiveDate,
    /// Spacing between consecutive due dates.
    pub interval: RecurrenceInterval,
    /// Equal or weighted distribution.
    pub distribution_mode: DistributionMode,
    /// Contractual office share, in percent. `None` applies the default.
    pub office_percent: Option<Decimal>,
    /// Total success fees. `None` means zero.
    pub success_fees: Option<Decimal>,
    /// Weight vector, required exactly when the mode is weighted.
    pub weights: Option<Vec<Decimal>>,
}

/// Options for a distribution recalculation.
#[derive(Debug, Clone, Default)]
pub struct RecalculateOptions {
    /// Allow discarding unsettled installments that carry manual edits.
    /// Without this flag, recalculation refuses rather than silently
    /// overwriting them.
    pub overwrite_manual_edits: bool,
    /// Weight vector, required exactly when the agreement's mode is
    /// weighted.
    pub weights: Option<Vec<Decimal>>,
}

/// Creates agreements and regenerates installment schedules.
pub struct DistributionService<'a> {
    store: &'a dyn AgreementStore,
}

impl<'a> DistributionService<'a> {
    /// Creates a service bound to the given store.
    pub fn new(store: &'a dyn AgreementStore) -> Self {
        Self { store }
    }

    /// Validates the input, persists the agreement, and batch-writes the
    /// generated installments.
    ///
    /// # Errors
    ///
    /// Fails on invalid input, generator errors, or store failure. No
    /// partial installment set is ever persisted.
    pub fn create_agreement(
        &self,
        input: CreateAgreementInput,
    ) -> Result<(Agreement, Vec<Installment>), DistributionError> {
        let office_percent = input
            .office_percent
            .unwrap_or_else(super::split::SplitCalculator::default_office_percent);
        let success_fees = input.success_fees.unwrap_or(Decimal::ZERO);

        if input.installment_count < 1 {
            return Err(DistributionError::InvalidInstallmentCount);
        }
        if input.total_value <= Decimal::ZERO {
            return Err(DistributionError::NonPositiveTotal(input.total_value));
        }
        check_scale("total_value", input.total_value)?;
        check_scale("success_fees", success_fees)?;

        let now = Utc::now();
        let agreement = Agreement {
            id: AgreementId::new(),
            case_id: input.case_id,
            kind: input.kind,
            direction: input.direction,
            total_value: input.total_value,
            installment_count: input.installment_count,
            first_due_date: input.first_due_date,
            interval: input.interval,
            distribution_mode: input.distribution_mode,
            office_percent,
            success_fees,
            created_at: now,
            updated_at: now,
        };

        let drafts = generator::generate(&agreement, input.weights.as_deref())?;
        let installments = materialize(&agreement, drafts);

        self.store.create_agreement(agreement.clone())?;
        self.store.create_installments(installments.clone())?;

        info!(
            agreement_id = %agreement.id,
            case_id = %agreement.case_id,
            installments = installments.len(),
            total = %agreement.total_value,
            "agreement created"
        );
        Ok((agreement, installments))
    }

    /// Deletes and regenerates the installment schedule of an agreement.
    ///
    /// Destructive and non-incremental by design: partial edits to a
    /// not-yet-started schedule are not worth reconciling incrementally.
    ///
    /// # Errors
    ///
    /// Fails when the agreement does not exist, when any installment is
    /// already settled, or when unsettled installments carry manual edits
    /// and `options.overwrite_manual_edits` is not set. Nothing is
    /// written on any failure path.
    pub fn recalculate_distribution(
        &self,
        agreement_id: AgreementId,
        options: RecalculateOptions,
    ) -> Result<Vec<Installment>, DistributionError> {
        let agreement = self
            .store
            .get_agreement(agreement_id)?
            .ok_or(DistributionError::AgreementNotFound(agreement_id))?;
        let existing = self.store.get_installments_by_agreement(agreement_id)?;

        if existing.iter().any(|i| i.status.is_settled()) {
            warn!(agreement_id = %agreement_id, "recalculation rejected: settled installments");
            return Err(DistributionError::AlreadySettled);
        }
        if !options.overwrite_manual_edits
            && existing
                .iter()
                .any(|i| i.manually_edited && i.status != InstallmentStatus::Cancelled)
        {
            warn!(agreement_id = %agreement_id, "recalculation rejected: manual edits present");
            return Err(DistributionError::ManualEditsPresent);
        }

        // Generate before deleting so a generator error leaves the
        // existing schedule untouched.
        let drafts = generator::generate(&agreement, options.weights.as_deref())?;
        let installments = materialize(&agreement, drafts);

        let deleted = self.store.delete_installments_by_agreement(agreement_id)?;
        self.store.create_installments(installments.clone())?;

        info!(
            agreement_id = %agreement_id,
            deleted,
            regenerated = installments.len(),
            "distribution recalculated"
        );
        Ok(installments)
    }
}

fn check_scale(field: &'static str, value: Decimal) -> Result<(), DistributionError> {
    if value.normalize().scale() > 2 {
        return Err(DistributionError::TooManyDecimalPlaces { field, value });
    }
    Ok(())
}

fn materialize(agreement: &Agreement, drafts: Vec<InstallmentDraft>) -> Vec<Installment> {
    drafts
        .into_iter()
        .map(|draft| Installment {
            id: InstallmentId::new(),
            agreement_id: agreement.id,
            sequence: draft.sequence,
            due_date: draft.due_date,
            gross_principal: draft.gross_principal,
            contractual_fee: draft.contractual_fee,
            success_fee: draft.success_fee,
            client_repayment: draft.client_repayment,
            status: InstallmentStatus::Pending,
            settlement_date: None,
            payment_method: None,
            disbursement_status: DisbursementStatus::NotApplicable,
            manually_edited: false,
            cancellation_reason: None,
            declaration_ref: None,
            declared_at: None,
            disbursement_proof_ref: None,
            disbursement_date: None,
            disbursed_by: None,
            version: 0,
        })
        .collect()
}
