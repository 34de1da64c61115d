//! Consistency audit against the in-memory store.
//!
//! Seeds real agreements through the distribution and synchronization
//! paths, then tampers with the stored state to produce each divergence
//! kind the checker classifies.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use lexum_core::agreement::types::{
    AgreementDirection, AgreementKind, DistributionMode, RecurrenceInterval,
};
use lexum_core::distribution::{CreateAgreementInput, DistributionService};
use lexum_core::ledger_sync::types::{EntryDirection, EntryStatus, InconsistencyKind, LedgerEntryFields};
use lexum_core::ledger_sync::{ConsistencyChecker, LedgerSyncService};
use lexum_core::stores::{AgreementStore, LedgerStore};
use lexum_shared::types::{CaseId, InstallmentId};
use lexum_store::MemoryStore;

mod common;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_agreement(store: &MemoryStore, count: u32) -> Vec<InstallmentId> {
    let distribution = DistributionService::new(store);
    let (agreement, installments) = distribution
        .create_agreement(CreateAgreementInput {
            case_id: CaseId::new(),
            kind: AgreementKind::Negotiated,
            direction: AgreementDirection::Receivable,
            total_value: dec!(9000),
            installment_count: count,
            first_due_date: date(2025, 2, 1),
            interval: RecurrenceInterval::Monthly,
            distribution_mode: DistributionMode::Equal,
            office_percent: Some(dec!(30)),
            success_fees: None,
            weights: None,
        })
        .unwrap();
    LedgerSyncService::new(store, store)
        .sync_agreement(agreement.id)
        .unwrap();
    installments.into_iter().map(|i| i.id).collect()
}

#[test]
fn test_synchronized_state_is_clean() {
    common::init_tracing();
    let store = MemoryStore::new();
    seed_agreement(&store, 3);
    let checker = ConsistencyChecker::new(&store, &store);
    let report = checker.check_consistency().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.summary.checked_installments, 3);
}

#[test]
fn test_amount_divergence_is_detected() {
    common::init_tracing();
    let store = MemoryStore::new();
    let ids = seed_agreement(&store, 3);

    // Tamper: rewrite one entry with a diverging amount.
    store
        .upsert_entry_for_installment(
            ids[0],
            LedgerEntryFields {
                description: "Parcela adulterada".into(),
                due_date: date(2025, 2, 1),
                effective_date: None,
                amount: dec!(2999),
                direction: EntryDirection::Revenue,
                status: EntryStatus::Pending,
            },
        )
        .unwrap();

    let checker = ConsistencyChecker::new(&store, &store);
    let report = checker.check_consistency().unwrap();
    assert_eq!(report.summary.amount_divergent, 1);
    let divergence = report
        .inconsistencies
        .iter()
        .find(|i| i.kind == InconsistencyKind::AmountDivergent)
        .unwrap();
    assert_eq!(divergence.installment_id, Some(ids[0]));
    assert_eq!(divergence.expected, Some(dec!(3000)));
    assert_eq!(divergence.found, Some(dec!(2999)));
}

#[test]
fn test_missing_entry_is_detected() {
    common::init_tracing();
    let store = MemoryStore::new();
    let distribution = DistributionService::new(&store);
    // Created but never synchronized: no entries exist yet.
    let (_, installments) = distribution
        .create_agreement(CreateAgreementInput {
            case_id: CaseId::new(),
            kind: AgreementKind::CourtCosts,
            direction: AgreementDirection::Payable,
            total_value: dec!(1200),
            installment_count: 2,
            first_due_date: date(2025, 2, 1),
            interval: RecurrenceInterval::Monthly,
            distribution_mode: DistributionMode::Equal,
            office_percent: Some(dec!(0)),
            success_fees: None,
            weights: None,
        })
        .unwrap();

    let checker = ConsistencyChecker::new(&store, &store);
    let report = checker.check_consistency().unwrap();
    assert_eq!(report.summary.installment_without_entry, 2);
    assert!(report
        .inconsistencies
        .iter()
        .all(|i| i.kind == InconsistencyKind::InstallmentWithoutEntry));
    assert_eq!(
        report.inconsistencies[0].expected,
        Some(installments[0].gross_principal)
    );
}

#[test]
fn test_orphaned_entry_is_detected() {
    common::init_tracing();
    let store = MemoryStore::new();
    seed_agreement(&store, 1);

    // An entry pointing at an installment that never existed.
    let orphan_installment = InstallmentId::new();
    store
        .upsert_entry_for_installment(
            orphan_installment,
            LedgerEntryFields {
                description: "resto de migracao".into(),
                due_date: date(2025, 1, 1),
                effective_date: None,
                amount: dec!(700),
                direction: EntryDirection::Revenue,
                status: EntryStatus::Pending,
            },
        )
        .unwrap();

    let checker = ConsistencyChecker::new(&store, &store);
    let report = checker.check_consistency().unwrap();
    assert_eq!(report.summary.entry_without_installment, 1);
    let orphan = report
        .inconsistencies
        .iter()
        .find(|i| i.kind == InconsistencyKind::EntryWithoutInstallment)
        .unwrap();
    assert_eq!(orphan.installment_id, Some(orphan_installment));
    assert_eq!(orphan.found, Some(dec!(700)));
}
