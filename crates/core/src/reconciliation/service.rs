//! Statement import, match suggestions, and reconciliation links.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::error::ReconciliationError;
use super::scoring::{score, within_window};
use super::types::{
    AppliedMatch, AutoReconcileReport, BankTransaction, Reconciliation, ReconciliationKind,
    ReconciliationStatus, StatementLine, Suggestion,
};
use crate::stores::{
    BankTransactionStore, LedgerStore, LinkOutcome, OpenEntryFilter, TransactionFilter,
};
use lexum_shared::config::MatchPolicy;
use lexum_shared::types::{BankTransactionId, LedgerEntryId, ReconciliationId, UserId};

/// Matches imported bank transactions against open ledger entries.
pub struct ReconciliationService<'a> {
    ledger: &'a dyn LedgerStore,
    bank: &'a dyn BankTransactionStore,
    policy: MatchPolicy,
}

impl<'a> ReconciliationService<'a> {
    /// Creates a service bound to the given stores and matching policy.
    pub fn new(
        ledger: &'a dyn LedgerStore,
        bank: &'a dyn BankTransactionStore,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            ledger,
            bank,
            policy,
        }
    }

    /// Imports a batch of normalized statement lines as pending
    /// transactions.
    ///
    /// Validation runs over the whole statement before anything is
    /// written, and the write itself is all-or-nothing.
    ///
    /// # Errors
    ///
    /// Fails when the statement is empty, any line carries a
    /// non-positive amount, more than 2 decimal places, or a blank
    /// description, or when the store fails.
    pub fn import_statement(
        &self,
        lines: Vec<StatementLine>,
    ) -> Result<Vec<BankTransaction>, ReconciliationError> {
        if lines.is_empty() {
            return Err(ReconciliationError::EmptyStatement);
        }
        for (index, line) in lines.iter().enumerate() {
            let line_no = index + 1;
            if line.amount <= rust_decimal::Decimal::ZERO {
                return Err(ReconciliationError::NonPositiveLineAmount {
                    line: line_no,
                    amount: line.amount,
                });
            }
            if line.amount.normalize().scale() > 2 {
                return Err(ReconciliationError::LineAmountScale {
                    line: line_no,
                    amount: line.amount,
                });
            }
            if line.description.trim().is_empty() {
                return Err(ReconciliationError::BlankLineDescription { line: line_no });
            }
        }

        let transactions: Vec<BankTransaction> = lines
            .into_iter()
            .map(|line| BankTransaction {
                id: BankTransactionId::new(),
                date: line.date,
                description: line.description,
                amount: line.amount,
                direction: line.direction,
                status: ReconciliationStatus::Pending,
            })
            .collect();

        self.bank.create_transactions(transactions.clone())?;
        info!(count = transactions.len(), "bank statement imported");
        Ok(transactions)
    }

    /// Scores every open ledger entry in the candidate window against a
    /// transaction.
    ///
    /// Suggestions come back in strictly non-increasing score order;
    /// ties break on the closest entry date, then on entry id. Zero
    /// scores (direction mismatches) are dropped.
    ///
    /// # Errors
    ///
    /// Fails when the transaction does not exist, is already
    /// reconciled, or the store fails.
    pub fn suggestions(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Vec<Suggestion>, ReconciliationError> {
        let transaction = self
            .bank
            .get_transaction(transaction_id)?
            .ok_or(ReconciliationError::TransactionNotFound(transaction_id))?;
        if transaction.status == ReconciliationStatus::Reconciled {
            return Err(ReconciliationError::TransactionAlreadyReconciled(transaction_id));
        }
        self.candidates(&transaction).map_err(Into::into)
    }

    /// Links a transaction to a ledger entry by operator choice.
    ///
    /// # Errors
    ///
    /// Fails when either side does not exist, the entry is not open, or
    /// either side already carries an active reconciliation. On a
    /// conflict the first link survives untouched.
    pub fn reconcile_manual(
        &self,
        transaction_id: BankTransactionId,
        entry_id: LedgerEntryId,
        created_by: Option<UserId>,
    ) -> Result<Reconciliation, ReconciliationError> {
        let transaction = self
            .bank
            .get_transaction(transaction_id)?
            .ok_or(ReconciliationError::TransactionNotFound(transaction_id))?;
        if transaction.status == ReconciliationStatus::Reconciled {
            return Err(ReconciliationError::TransactionAlreadyReconciled(transaction_id));
        }
        let entry = self
            .ledger
            .get_entry(entry_id)?
            .ok_or(ReconciliationError::EntryNotFound(entry_id))?;
        if !entry.status.is_active() {
            return Err(ReconciliationError::EntryNotOpen(entry_id));
        }
        if entry.reconciled {
            return Err(ReconciliationError::EntryAlreadyReconciled(entry_id));
        }

        let link = self.link(transaction_id, entry_id, ReconciliationKind::Manual, created_by)?;
        info!(
            transaction_id = %transaction_id,
            entry_id = %entry_id,
            "manual reconciliation created"
        );
        Ok(link)
    }

    /// Runs one automatic matching pass over pending transactions.
    ///
    /// Each transaction whose best candidate scores at or above the
    /// auto-apply threshold is linked, crediting `run_by` when the pass
    /// was triggered by an operator; a best candidate below the
    /// threshold marks the transaction as suggested for manual review.
    /// The pass checkpoints per transaction: one failure is recorded in
    /// the report and the pass moves on.
    ///
    /// # Errors
    ///
    /// Fails only when listing the pending transactions fails.
    pub fn reconcile_automatically(
        &self,
        filter: &TransactionFilter,
        run_by: Option<UserId>,
    ) -> Result<AutoReconcileReport, ReconciliationError> {
        let pending = self.bank.list_pending_transactions(filter)?;
        let mut report = AutoReconcileReport::default();

        for transaction in &pending {
            match self.auto_reconcile_one(transaction, run_by) {
                Ok(Outcome::Applied(entry_id)) => report.applied.push(AppliedMatch {
                    transaction_id: transaction.id,
                    entry_id,
                }),
                Ok(Outcome::BelowThreshold) => report.below_threshold.push(transaction.id),
                Ok(Outcome::NoCandidates) => report.no_candidates.push(transaction.id),
                Err(err) => {
                    warn!(
                        transaction_id = %transaction.id,
                        error = %err,
                        "automatic reconciliation failed for transaction"
                    );
                    report.failures.push((transaction.id, err.to_string()));
                }
            }
        }

        info!(
            scanned = pending.len(),
            applied = report.applied.len(),
            below_threshold = report.below_threshold.len(),
            no_candidates = report.no_candidates.len(),
            failures = report.failures.len(),
            "automatic reconciliation pass finished"
        );
        Ok(report)
    }

    /// Undoes the active reconciliation of a transaction.
    ///
    /// Both sides go back to their open state in the same operation.
    ///
    /// # Errors
    ///
    /// Fails when the transaction does not exist, has no active
    /// reconciliation, or the store fails.
    pub fn unreconcile(
        &self,
        transaction_id: BankTransactionId,
    ) -> Result<Reconciliation, ReconciliationError> {
        match self.bank.delete_reconciliation(transaction_id)? {
            Some(link) => {
                info!(
                    transaction_id = %transaction_id,
                    entry_id = %link.entry_id,
                    "reconciliation undone"
                );
                Ok(link)
            }
            None => {
                if self.bank.get_transaction(transaction_id)?.is_none() {
                    Err(ReconciliationError::TransactionNotFound(transaction_id))
                } else {
                    Err(ReconciliationError::NoActiveReconciliation(transaction_id))
                }
            }
        }
    }

    fn auto_reconcile_one(
        &self,
        transaction: &BankTransaction,
        run_by: Option<UserId>,
    ) -> Result<Outcome, ReconciliationError> {
        let candidates = self.candidates(transaction)?;
        let Some(best) = candidates.first() else {
            return Ok(Outcome::NoCandidates);
        };
        if best.score < self.policy.auto_apply_threshold {
            if transaction.status != ReconciliationStatus::Suggested {
                self.bank
                    .set_transaction_status(transaction.id, ReconciliationStatus::Suggested)?;
            }
            return Ok(Outcome::BelowThreshold);
        }
        let link = self.link(transaction.id, best.entry.id, ReconciliationKind::Automatic, run_by)?;
        Ok(Outcome::Applied(link.entry_id))
    }

    fn candidates(
        &self,
        transaction: &BankTransaction,
    ) -> Result<Vec<Suggestion>, lexum_shared::StoreError> {
        let tolerance = Duration::days(i64::from(self.policy.date_tolerance_days));
        let open = self.ledger.list_open_entries(&OpenEntryFilter {
            date_from: Some(transaction.date - tolerance),
            date_to: Some(transaction.date + tolerance),
        })?;

        let mut suggestions: Vec<Suggestion> = open
            .into_iter()
            .filter(|entry| within_window(&self.policy, transaction, entry))
            .filter_map(|entry| {
                let match_score = score(&self.policy, transaction, &entry);
                (match_score.total > rust_decimal::Decimal::ZERO).then(|| Suggestion {
                    entry,
                    score: match_score.total,
                    amount_score: match_score.amount,
                    date_score: match_score.date,
                    text_score: match_score.text,
                })
            })
            .collect();

        suggestions.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| {
                    let a_days = (transaction.date - a.entry.matching_date()).num_days().abs();
                    let b_days = (transaction.date - b.entry.matching_date()).num_days().abs();
                    a_days.cmp(&b_days)
                })
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        Ok(suggestions)
    }

    fn link(
        &self,
        transaction_id: BankTransactionId,
        entry_id: LedgerEntryId,
        kind: ReconciliationKind,
        created_by: Option<UserId>,
    ) -> Result<Reconciliation, ReconciliationError> {
        let link = Reconciliation {
            id: ReconciliationId::new(),
            transaction_id,
            entry_id,
            kind,
            created_by,
            created_at: Utc::now(),
        };
        match self.bank.create_reconciliation(link.clone())? {
            LinkOutcome::Created => Ok(link),
            LinkOutcome::TransactionAlreadyLinked => {
                Err(ReconciliationError::TransactionAlreadyReconciled(transaction_id))
            }
            LinkOutcome::EntryAlreadyLinked => {
                Err(ReconciliationError::EntryAlreadyReconciled(entry_id))
            }
        }
    }
}

enum Outcome {
    Applied(LedgerEntryId),
    BelowThreshold,
    NoCandidates,
}
