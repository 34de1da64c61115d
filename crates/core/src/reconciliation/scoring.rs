//! Similarity scoring between bank transactions and ledger entries.
//!
//! Pure functions over exact decimals; the matcher never touches the
//! store. Scores live in `[0, 1]` and combine three components under
//! the configured weights:
//!
//! - amount closeness: `1 - |a - b| / max(a, b)`
//! - date proximity: linear falloff across the tolerance window
//! - text similarity: Sørensen-Dice over lowercase alphanumeric tokens
//!
//! A direction mismatch (credit vs expense, debit vs revenue) zeroes
//! the whole score regardless of the components.

use lexum_shared::config::MatchPolicy;
use rust_decimal::Decimal;
use std::collections::HashSet;

use super::types::{BankTransaction, TransactionDirection};
use crate::ledger_sync::types::{EntryDirection, LedgerEntry};

/// Component and composite scores for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    /// Amount closeness in `[0, 1]`.
    pub amount: Decimal,
    /// Date proximity in `[0, 1]`.
    pub date: Decimal,
    /// Description similarity in `[0, 1]`.
    pub text: Decimal,
    /// Weighted composite in `[0, 1]`.
    pub total: Decimal,
}

impl MatchScore {
    const ZERO: Self = Self {
        amount: Decimal::ZERO,
        date: Decimal::ZERO,
        text: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Scores one transaction against one candidate entry.
#[must_use]
pub fn score(policy: &MatchPolicy, transaction: &BankTransaction, entry: &LedgerEntry) -> MatchScore {
    if !directions_compatible(transaction.direction, entry.direction) {
        return MatchScore::ZERO;
    }

    let amount = amount_closeness(transaction.amount, entry.amount);
    let days = (transaction.date - entry.matching_date()).num_days().unsigned_abs();
    let date = date_proximity(days, policy.date_tolerance_days);
    let text = text_similarity(&transaction.description, &entry.description);

    let total =
        policy.amount_weight * amount + policy.date_weight * date + policy.text_weight * text;

    MatchScore {
        amount,
        date,
        text,
        total,
    }
}

/// True when the entry's date falls inside the candidate window.
#[must_use]
pub fn within_window(policy: &MatchPolicy, transaction: &BankTransaction, entry: &LedgerEntry) -> bool {
    let days = (transaction.date - entry.matching_date()).num_days().unsigned_abs();
    days <= u64::from(policy.date_tolerance_days)
}

fn directions_compatible(transaction: TransactionDirection, entry: EntryDirection) -> bool {
    transaction.matching_entry_direction() == entry
}

/// `1 - |a - b| / max(a, b)`, clamped to `[0, 1]`.
fn amount_closeness(a: Decimal, b: Decimal) -> Decimal {
    let max = a.max(b);
    if max <= Decimal::ZERO {
        // Both amounts non-positive only on malformed data; treat equal
        // zeros as a perfect match.
        return if a == b { Decimal::ONE } else { Decimal::ZERO };
    }
    let closeness = Decimal::ONE - (a - b).abs() / max;
    closeness.max(Decimal::ZERO)
}

/// Linear falloff: same day scores 1, the window edge scores 0.
fn date_proximity(days_apart: u64, tolerance_days: u32) -> Decimal {
    if days_apart > u64::from(tolerance_days) {
        return Decimal::ZERO;
    }
    if tolerance_days == 0 {
        return Decimal::ONE;
    }
    Decimal::ONE - Decimal::from(days_apart) / Decimal::from(tolerance_days)
}

/// Sørensen-Dice coefficient over lowercase alphanumeric token sets.
fn text_similarity(a: &str, b: &str) -> Decimal {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() && tokens_b.is_empty() {
        return Decimal::ONE;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return Decimal::ZERO;
    }
    let common = tokens_a.intersection(&tokens_b).count();
    Decimal::from(2 * common) / Decimal::from(tokens_a.len() + tokens_b.len())
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_sync::types::EntryStatus;
    use crate::reconciliation::types::ReconciliationStatus;
    use chrono::NaiveDate;
    use lexum_shared::types::{BankTransactionId, LedgerEntryId};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(amount: Decimal, on: NaiveDate, description: &str) -> BankTransaction {
        BankTransaction {
            id: BankTransactionId::new(),
            date: on,
            description: description.into(),
            amount,
            direction: TransactionDirection::Credit,
            status: ReconciliationStatus::Pending,
        }
    }

    fn entry(amount: Decimal, due: NaiveDate, description: &str) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            installment_id: None,
            description: description.into(),
            due_date: due,
            effective_date: None,
            amount,
            direction: EntryDirection::Revenue,
            status: EntryStatus::Pending,
            reconciled: false,
        }
    }

    #[test]
    fn test_identical_pair_scores_one() {
        let policy = MatchPolicy::default();
        let tx = transaction(dec!(5000), date(2025, 3, 10), "TED Parcela 1/2 caso 42");
        let e = entry(dec!(5000), date(2025, 3, 10), "TED Parcela 1/2 caso 42");
        let s = score(&policy, &tx, &e);
        assert_eq!(s.amount, Decimal::ONE);
        assert_eq!(s.date, Decimal::ONE);
        assert_eq!(s.text, Decimal::ONE);
        assert_eq!(s.total, Decimal::ONE);
    }

    #[test]
    fn test_direction_mismatch_zeroes_score() {
        let policy = MatchPolicy::default();
        let tx = transaction(dec!(5000), date(2025, 3, 10), "pagamento");
        let mut e = entry(dec!(5000), date(2025, 3, 10), "pagamento");
        e.direction = EntryDirection::Expense;
        assert_eq!(score(&policy, &tx, &e), MatchScore::ZERO);
    }

    #[test]
    fn test_amount_closeness_is_relative() {
        assert_eq!(amount_closeness(dec!(100), dec!(100)), Decimal::ONE);
        assert_eq!(amount_closeness(dec!(90), dec!(100)), dec!(0.9));
        assert_eq!(amount_closeness(dec!(100), dec!(200)), dec!(0.5));
        assert_eq!(amount_closeness(dec!(0), dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn test_date_proximity_falls_off_linearly() {
        assert_eq!(date_proximity(0, 5), Decimal::ONE);
        assert_eq!(date_proximity(3, 5), dec!(0.4));
        assert_eq!(date_proximity(5, 5), Decimal::ZERO);
        assert_eq!(date_proximity(6, 5), Decimal::ZERO);
        assert_eq!(date_proximity(0, 0), Decimal::ONE);
        assert_eq!(date_proximity(1, 0), Decimal::ZERO);
    }

    #[test]
    fn test_date_uses_effective_date_when_present() {
        let policy = MatchPolicy::default();
        let tx = transaction(dec!(100), date(2025, 3, 10), "x");
        let mut e = entry(dec!(100), date(2025, 3, 1), "x");
        e.effective_date = Some(date(2025, 3, 10));
        let s = score(&policy, &tx, &e);
        assert_eq!(s.date, Decimal::ONE);
    }

    #[test]
    fn test_text_similarity_ignores_case_and_punctuation() {
        assert_eq!(
            text_similarity("TED - Parcela 1/2", "ted parcela 1 2"),
            Decimal::ONE
        );
    }

    #[test]
    fn test_text_similarity_partial_overlap() {
        // {ted, honorarios} vs {honorarios, caso}: 2*1 / (2+2) = 0.5.
        assert_eq!(text_similarity("TED honorarios", "honorarios caso"), dec!(0.5));
    }

    #[test]
    fn test_text_similarity_empty_descriptions() {
        assert_eq!(text_similarity("", ""), Decimal::ONE);
        assert_eq!(text_similarity("ted", ""), Decimal::ZERO);
    }

    #[test]
    fn test_within_window_honors_tolerance() {
        let policy = MatchPolicy::default();
        let tx = transaction(dec!(100), date(2025, 3, 10), "x");
        assert!(within_window(&policy, &tx, &entry(dec!(100), date(2025, 3, 5), "x")));
        assert!(within_window(&policy, &tx, &entry(dec!(100), date(2025, 3, 15), "x")));
        assert!(!within_window(&policy, &tx, &entry(dec!(100), date(2025, 3, 4), "x")));
    }

    #[test]
    fn test_composite_uses_configured_weights() {
        let policy = MatchPolicy::default();
        let tx = transaction(dec!(100), date(2025, 3, 10), "ted honorarios");
        let e = entry(dec!(90), date(2025, 3, 12), "honorarios caso");
        let s = score(&policy, &tx, &e);
        let expected = dec!(0.5) * s.amount + dec!(0.3) * s.date + dec!(0.2) * s.text;
        assert_eq!(s.total, expected);
        assert!(s.total > Decimal::ZERO && s.total < Decimal::ONE);
    }
}
