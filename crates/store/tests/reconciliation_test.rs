//! Reconciliation flows against the in-memory store.
//!
//! Exercises statement import, suggestion ordering, manual and
//! automatic linking, conflict behavior, and undo, with ledger entries
//! produced by the real synchronization path.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use lexum_core::agreement::types::{
    AgreementDirection, AgreementKind, DistributionMode, RecurrenceInterval,
};
use lexum_core::distribution::{CreateAgreementInput, DistributionService};
use lexum_core::ledger_sync::LedgerSyncService;
use lexum_core::reconciliation::{
    ReconciliationError, ReconciliationService, ReconciliationStatus, StatementLine,
    TransactionDirection,
};
use lexum_core::stores::{BankTransactionStore, LedgerStore, TransactionFilter};
use lexum_shared::config::MatchPolicy;
use lexum_shared::types::{CaseId, UserId};
use lexum_store::MemoryStore;

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a receivable agreement and projects it into the ledger.
fn seed_ledger(store: &MemoryStore, total: rust_decimal::Decimal, count: u32) {
    let distribution = DistributionService::new(store);
    let sync = LedgerSyncService::new(store, store);
    let (agreement, _) = distribution
        .create_agreement(CreateAgreementInput {
            case_id: CaseId::new(),
            kind: AgreementKind::Negotiated,
            direction: AgreementDirection::Receivable,
            total_value: total,
            installment_count: count,
            first_due_date: date(2025, 3, 1),
            interval: RecurrenceInterval::Monthly,
            distribution_mode: DistributionMode::Equal,
            office_percent: Some(dec!(30)),
            success_fees: None,
            weights: None,
        })
        .unwrap();
    sync.sync_agreement(agreement.id).unwrap();
}

fn line(amount: rust_decimal::Decimal, on: NaiveDate, description: &str) -> StatementLine {
    StatementLine {
        date: on,
        description: description.into(),
        amount,
        direction: TransactionDirection::Credit,
    }
}

#[test]
fn test_import_then_list_pending() {
    common::init_tracing();
    let store = MemoryStore::new();
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let imported = service
        .import_statement(vec![
            line(dec!(5000), date(2025, 3, 3), "TED Parcela 1"),
            line(dec!(5000), date(2025, 4, 2), "TED Parcela 2"),
        ])
        .unwrap();
    assert_eq!(imported.len(), 2);

    let pending = store
        .list_pending_transactions(&TransactionFilter::default())
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending
        .iter()
        .all(|tx| tx.status == ReconciliationStatus::Pending));
    // Sorted by date.
    assert_eq!(pending[0].date, date(2025, 3, 3));
}

#[test]
fn test_suggestions_prefer_exact_amount_and_date() {
    common::init_tracing();
    let store = MemoryStore::new();
    // Two entries: 5000 due Mar 1 and Apr 1.
    seed_ledger(&store, dec!(10000), 2);
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let imported = service
        .import_statement(vec![line(dec!(5000), date(2025, 3, 2), "Parcela 1/2")])
        .unwrap();
    let suggestions = service.suggestions(imported[0].id).unwrap();

    // Only the March entry falls inside the 5-day window.
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].entry.due_date, date(2025, 3, 1));
    assert_eq!(suggestions[0].amount_score, dec!(1));
    assert!(suggestions[0].score > dec!(0.8));
}

#[test]
fn test_manual_conflict_keeps_first_link() {
    common::init_tracing();
    let store = MemoryStore::new();
    seed_ledger(&store, dec!(5000), 1);
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let entry = store
        .list_open_entries(&lexum_core::stores::OpenEntryFilter::default())
        .unwrap()
        .remove(0);
    let imported = service
        .import_statement(vec![
            line(dec!(5000), date(2025, 3, 2), "TED Parcela"),
            line(dec!(5000), date(2025, 3, 3), "TED duplicada"),
        ])
        .unwrap();

    let user = UserId::new();
    let first = service
        .reconcile_manual(imported[0].id, entry.id, Some(user))
        .unwrap();

    // Linking the second transaction to the same entry fails and the
    // first link survives.
    let err = service
        .reconcile_manual(imported[1].id, entry.id, Some(user))
        .unwrap_err();
    assert!(matches!(
        err,
        ReconciliationError::EntryAlreadyReconciled(id) if id == entry.id
    ));
    let surviving = store
        .find_reconciliation_by_transaction(imported[0].id)
        .unwrap()
        .unwrap();
    assert_eq!(surviving.id, first.id);
    assert_eq!(
        store.get_transaction(imported[1].id).unwrap().unwrap().status,
        ReconciliationStatus::Pending
    );
}

#[test]
fn test_reconciled_transaction_rejects_second_link() {
    common::init_tracing();
    let store = MemoryStore::new();
    seed_ledger(&store, dec!(10000), 2);
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let entries = store
        .list_open_entries(&lexum_core::stores::OpenEntryFilter::default())
        .unwrap();
    let imported = service
        .import_statement(vec![line(dec!(5000), date(2025, 3, 2), "TED Parcela")])
        .unwrap();

    service
        .reconcile_manual(imported[0].id, entries[0].id, None)
        .unwrap();
    let err = service
        .reconcile_manual(imported[0].id, entries[1].id, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ReconciliationError::TransactionAlreadyReconciled(id) if id == imported[0].id
    ));
}

#[test]
fn test_automatic_pass_applies_and_flags() {
    common::init_tracing();
    let store = MemoryStore::new();
    // Entries: 5000 due Mar 1, 5000 due Apr 1.
    seed_ledger(&store, dec!(10000), 2);
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let imported = service
        .import_statement(vec![
            // Strong match for the March entry.
            line(dec!(5000), date(2025, 3, 1), "Parcela 1/2 - caso"),
            // Weak: wrong amount and unrelated text, still in window.
            line(dec!(2000), date(2025, 4, 3), "deposito avulso"),
            // No candidate inside the window at all.
            line(dec!(5000), date(2025, 6, 15), "TED fora de janela"),
        ])
        .unwrap();

    let report = service
        .reconcile_automatically(&TransactionFilter::default(), None)
        .unwrap();
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].transaction_id, imported[0].id);
    assert_eq!(report.below_threshold, vec![imported[1].id]);
    assert_eq!(report.no_candidates, vec![imported[2].id]);
    assert!(report.failures.is_empty());

    assert_eq!(
        store.get_transaction(imported[0].id).unwrap().unwrap().status,
        ReconciliationStatus::Reconciled
    );
    assert_eq!(
        store.get_transaction(imported[1].id).unwrap().unwrap().status,
        ReconciliationStatus::Suggested
    );
}

#[test]
fn test_unreconcile_reopens_both_sides() {
    common::init_tracing();
    let store = MemoryStore::new();
    seed_ledger(&store, dec!(5000), 1);
    let service = ReconciliationService::new(&store, &store, MatchPolicy::default());

    let entry = store
        .list_open_entries(&lexum_core::stores::OpenEntryFilter::default())
        .unwrap()
        .remove(0);
    let imported = service
        .import_statement(vec![line(dec!(5000), date(2025, 3, 2), "TED Parcela")])
        .unwrap();
    service
        .reconcile_manual(imported[0].id, entry.id, None)
        .unwrap();

    let removed = service.unreconcile(imported[0].id).unwrap();
    assert_eq!(removed.entry_id, entry.id);
    assert_eq!(
        store.get_transaction(imported[0].id).unwrap().unwrap().status,
        ReconciliationStatus::Pending
    );
    assert!(!store.get_entry(entry.id).unwrap().unwrap().reconciled);

    // A second undo has nothing to remove.
    assert!(matches!(
        service.unreconcile(imported[0].id),
        Err(ReconciliationError::NoActiveReconciliation(_))
    ));

    // And the pair can be linked again.
    service
        .reconcile_manual(imported[0].id, entry.id, None)
        .unwrap();
}
