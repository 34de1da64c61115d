//! Property-based tests for the match scorer.
//!
//! Scores are pinned to `[0, 1]` over randomized inputs, and a
//! direction mismatch always zeroes the composite.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::scoring::score;
use super::service::ReconciliationService;
use super::types::{BankTransaction, ReconciliationStatus, TransactionDirection};
use crate::ledger_sync::types::{EntryDirection, EntryStatus, LedgerEntry};
use crate::stores::{MockBankTransactionStore, MockLedgerStore};
use lexum_shared::config::MatchPolicy;
use lexum_shared::types::{BankTransactionId, LedgerEntryId};

/// Cent-precise positive amounts up to 10 million.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..=365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn arb_description() -> impl Strategy<Value = String> {
    "[a-z0-9 /-]{0,40}"
}

fn transaction(
    amount: Decimal,
    date: NaiveDate,
    description: String,
    direction: TransactionDirection,
) -> BankTransaction {
    BankTransaction {
        id: BankTransactionId::new(),
        date,
        description,
        amount,
        direction,
        status: ReconciliationStatus::Pending,
    }
}

fn entry(
    amount: Decimal,
    date: NaiveDate,
    description: String,
    direction: EntryDirection,
) -> LedgerEntry {
    LedgerEntry {
        id: LedgerEntryId::new(),
        installment_id: None,
        description,
        due_date: date,
        effective_date: None,
        amount,
        direction,
        status: EntryStatus::Pending,
        reconciled: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every component and the composite stay inside `[0, 1]`.
    #[test]
    fn prop_scores_are_ratios(
        tx_amount in arb_amount(),
        entry_amount in arb_amount(),
        tx_date in arb_date(),
        entry_date in arb_date(),
        tx_text in arb_description(),
        entry_text in arb_description(),
    ) {
        let policy = MatchPolicy::default();
        let tx = transaction(tx_amount, tx_date, tx_text, TransactionDirection::Credit);
        let e = entry(entry_amount, entry_date, entry_text, EntryDirection::Revenue);
        let s = score(&policy, &tx, &e);
        for component in [s.amount, s.date, s.text, s.total] {
            prop_assert!(component >= Decimal::ZERO);
            prop_assert!(component <= Decimal::ONE);
        }
    }

    /// An entry identical to the transaction always scores exactly 1.
    #[test]
    fn prop_identical_pair_scores_one(
        amount in arb_amount(),
        date in arb_date(),
        text in "[a-z0-9]{1,20}( [a-z0-9]{1,20}){0,4}",
    ) {
        let policy = MatchPolicy::default();
        let tx = transaction(amount, date, text.clone(), TransactionDirection::Credit);
        let e = entry(amount, date, text, EntryDirection::Revenue);
        prop_assert_eq!(score(&policy, &tx, &e).total, Decimal::ONE);
    }

    /// A direction mismatch zeroes the composite regardless of how
    /// similar the rest looks.
    #[test]
    fn prop_direction_mismatch_scores_zero(
        amount in arb_amount(),
        date in arb_date(),
        text in arb_description(),
    ) {
        let policy = MatchPolicy::default();
        let tx = transaction(amount, date, text.clone(), TransactionDirection::Credit);
        let e = entry(amount, date, text, EntryDirection::Expense);
        prop_assert_eq!(score(&policy, &tx, &e).total, Decimal::ZERO);
    }

    /// Moving the amount closer to the transaction's never lowers the
    /// amount component.
    #[test]
    fn prop_amount_component_monotone(
        tx_amount in arb_amount(),
        far in arb_amount(),
        date in arb_date(),
    ) {
        let policy = MatchPolicy::default();
        let near = (tx_amount + far) / Decimal::TWO;
        let tx = transaction(tx_amount, date, "ted".into(), TransactionDirection::Credit);
        let near_entry = entry(near, date, "ted".into(), EntryDirection::Revenue);
        let far_entry = entry(far, date, "ted".into(), EntryDirection::Revenue);
        prop_assert!(
            score(&policy, &tx, &near_entry).amount >= score(&policy, &tx, &far_entry).amount
        );
    }

    /// Suggestions come back in non-increasing score order no matter
    /// what the candidate pool looks like.
    #[test]
    fn prop_suggestions_sorted_by_score(
        tx_amount in arb_amount(),
        tx_text in arb_description(),
        pool in proptest::collection::vec(
            (arb_amount(), 0i64..=10, arb_description(), any::<bool>()),
            0..8,
        ),
    ) {
        let base = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let tx = transaction(tx_amount, base, tx_text, TransactionDirection::Credit);
        let tx_id = tx.id;
        let entries: Vec<LedgerEntry> = pool
            .into_iter()
            .map(|(amount, offset, text, revenue)| {
                let direction = if revenue {
                    EntryDirection::Revenue
                } else {
                    EntryDirection::Expense
                };
                entry(amount, base + chrono::Duration::days(offset - 5), text, direction)
            })
            .collect();

        let mut ledger = MockLedgerStore::new();
        ledger
            .expect_list_open_entries()
            .returning(move |_| Ok(entries.clone()));
        let mut bank = MockBankTransactionStore::new();
        bank.expect_get_transaction()
            .returning(move |_| Ok(Some(tx.clone())));

        let service = ReconciliationService::new(&ledger, &bank, MatchPolicy::default());
        let suggestions = service.suggestions(tx_id).unwrap();
        for pair in suggestions.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for suggestion in &suggestions {
            prop_assert!(suggestion.score > Decimal::ZERO);
        }
    }
}
