//! Consistency audit between installments and ledger entries.
//!
//! Read-only: the checker reports divergences, it never repairs them.
//! One bad record yields one inconsistency entry; the pass always runs
//! to completion.

use chrono::Utc;
use tracing::{info, warn};

use super::error::LedgerSyncError;
use super::types::{ConsistencyReport, ConsistencySummary, Inconsistency, InconsistencyKind};
use crate::agreement::types::InstallmentStatus;
use crate::stores::{AgreementStore, InstallmentFilter, LedgerStore};

/// Audits installments against their ledger entries.
pub struct ConsistencyChecker<'a> {
    agreements: &'a dyn AgreementStore,
    ledger: &'a dyn LedgerStore,
}

impl<'a> ConsistencyChecker<'a> {
    /// Creates a checker bound to the given stores.
    pub fn new(agreements: &'a dyn AgreementStore, ledger: &'a dyn LedgerStore) -> Self {
        Self { agreements, ledger }
    }

    /// Runs a full audit pass.
    ///
    /// Every non-cancelled installment must have a ledger entry with a
    /// matching amount; every installment-linked entry must point at an
    /// existing installment. Runs on demand or on a schedule; it feeds
    /// both alerting and the summary dashboard.
    ///
    /// # Errors
    ///
    /// Fails only when a store call fails; individual divergences become
    /// report lines, never errors.
    pub fn check_consistency(&self) -> Result<ConsistencyReport, LedgerSyncError> {
        let eligible = self.agreements.list_installments(&InstallmentFilter {
            statuses: Some(vec![
                InstallmentStatus::Pending,
                InstallmentStatus::Received,
                InstallmentStatus::Paid,
            ]),
            ..InstallmentFilter::default()
        })?;

        let mut inconsistencies = Vec::new();
        let mut summary = ConsistencySummary {
            checked_installments: eligible.len(),
            ..ConsistencySummary::default()
        };

        for installment in &eligible {
            match self.ledger.find_entry_by_installment(installment.id)? {
                None => {
                    summary.installment_without_entry += 1;
                    inconsistencies.push(Inconsistency {
                        installment_id: Some(installment.id),
                        entry_id: None,
                        kind: InconsistencyKind::InstallmentWithoutEntry,
                        expected: Some(installment.gross_principal),
                        found: None,
                        resolved: false,
                    });
                }
                Some(entry) if entry.amount != installment.gross_principal => {
                    summary.amount_divergent += 1;
                    inconsistencies.push(Inconsistency {
                        installment_id: Some(installment.id),
                        entry_id: Some(entry.id),
                        kind: InconsistencyKind::AmountDivergent,
                        expected: Some(installment.gross_principal),
                        found: Some(entry.amount),
                        resolved: false,
                    });
                }
                Some(_) => {}
            }
        }

        for entry in self.ledger.list_installment_linked_entries()? {
            let Some(installment_id) = entry.installment_id else {
                continue;
            };
            if self.agreements.get_installment(installment_id)?.is_none() {
                summary.entry_without_installment += 1;
                inconsistencies.push(Inconsistency {
                    installment_id: Some(installment_id),
                    entry_id: Some(entry.id),
                    kind: InconsistencyKind::EntryWithoutInstallment,
                    expected: None,
                    found: Some(entry.amount),
                    resolved: false,
                });
            }
        }

        if inconsistencies.is_empty() {
            info!(checked = summary.checked_installments, "consistency audit clean");
        } else {
            warn!(
                checked = summary.checked_installments,
                divergences = inconsistencies.len(),
                "consistency audit found divergences"
            );
        }

        Ok(ConsistencyReport {
            inconsistencies,
            summary,
            checked_at: Utc::now(),
        })
    }
}
