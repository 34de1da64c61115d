//! Ledger entry types and consistency audit records.
//!
//! The ledger itself is owned by the financial subsystem; the engine
//! sees entries only through the ledger store contract. The types here
//! are the engine's view of that boundary.

use chrono::{DateTime, NaiveDate, Utc};
use lexum_shared::types::{InstallmentId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryDirection {
    /// Money coming into the office (`receita`).
    #[serde(rename = "receita")]
    Revenue,
    /// Money going out (`despesa`).
    #[serde(rename = "despesa")]
    Expense,
}

impl EntryDirection {
    /// Returns the wire representation of the direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "receita",
            Self::Expense => "despesa",
        }
    }

    /// Parses a direction from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "receita" => Some(Self::Revenue),
            "despesa" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Expected but not yet effective (`pendente`).
    #[serde(rename = "pendente")]
    Pending,
    /// Money moved (`confirmado`).
    #[serde(rename = "confirmado")]
    Confirmed,
    /// Voided (`cancelado`).
    #[serde(rename = "cancelado")]
    Cancelled,
    /// Confirmed and later reversed (`estornado`).
    #[serde(rename = "estornado")]
    Reversed,
}

impl EntryStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Confirmed => "confirmado",
            Self::Cancelled => "cancelado",
            Self::Reversed => "estornado",
        }
    }

    /// Parses a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(Self::Pending),
            "confirmado" => Some(Self::Confirmed),
            "cancelado" => Some(Self::Cancelled),
            "estornado" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// True when the entry still participates in reconciliation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accounting record in the financial ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: LedgerEntryId,
    /// The installment this entry mirrors, when synchronized from one.
    pub installment_id: Option<InstallmentId>,
    /// Human-readable description.
    pub description: String,
    /// Scheduled date of the movement.
    pub due_date: NaiveDate,
    /// Date the movement actually happened.
    pub effective_date: Option<NaiveDate>,
    /// Amount of the movement, always positive.
    pub amount: Decimal,
    /// Revenue or expense.
    pub direction: EntryDirection,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Set while an active reconciliation links this entry.
    pub reconciled: bool,
}

impl LedgerEntry {
    /// Date the matcher compares against: effective when known,
    /// scheduled otherwise.
    #[must_use]
    pub fn matching_date(&self) -> NaiveDate {
        self.effective_date.unwrap_or(self.due_date)
    }
}

/// Fields written when upserting the entry linked to an installment.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntryFields {
    /// Human-readable description.
    pub description: String,
    /// Scheduled date of the movement.
    pub due_date: NaiveDate,
    /// Date the movement actually happened.
    pub effective_date: Option<NaiveDate>,
    /// Amount of the movement.
    pub amount: Decimal,
    /// Revenue or expense.
    pub direction: EntryDirection,
    /// Lifecycle status.
    pub status: EntryStatus,
}

/// Kind of divergence between an installment and the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InconsistencyKind {
    /// Entry exists but its amount differs from the installment.
    AmountDivergent,
    /// Eligible installment has no ledger entry.
    InstallmentWithoutEntry,
    /// Installment-linked entry points at a missing installment.
    EntryWithoutInstallment,
}

/// One detected divergence between installments and ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inconsistency {
    /// The installment side of the divergence, when it exists.
    pub installment_id: Option<InstallmentId>,
    /// The ledger side of the divergence, when it exists.
    pub entry_id: Option<LedgerEntryId>,
    /// Classification.
    pub kind: InconsistencyKind,
    /// Amount the installment says should be in the ledger.
    pub expected: Option<Decimal>,
    /// Amount actually found in the ledger.
    pub found: Option<Decimal>,
    /// Set once an operator addresses the divergence.
    pub resolved: bool,
}

/// Per-kind counts for the audit dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencySummary {
    /// Installments inspected.
    pub checked_installments: usize,
    /// Entries with diverging amounts.
    pub amount_divergent: usize,
    /// Eligible installments missing their entry.
    pub installment_without_entry: usize,
    /// Orphaned installment-linked entries.
    pub entry_without_installment: usize,
}

/// Outcome of a consistency audit pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyReport {
    /// Every detected divergence.
    pub inconsistencies: Vec<Inconsistency>,
    /// Per-kind counts.
    pub summary: ConsistencySummary,
    /// When the audit ran.
    pub checked_at: DateTime<Utc>,
}

impl ConsistencyReport {
    /// True when no divergence was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.inconsistencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(EntryDirection::Revenue.as_str(), "receita");
        assert_eq!(EntryDirection::Expense.as_str(), "despesa");
        assert_eq!(EntryStatus::Pending.as_str(), "pendente");
        assert_eq!(EntryStatus::Confirmed.as_str(), "confirmado");
        assert_eq!(EntryStatus::Cancelled.as_str(), "cancelado");
        assert_eq!(EntryStatus::Reversed.as_str(), "estornado");
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in [
            EntryStatus::Pending,
            EntryStatus::Confirmed,
            EntryStatus::Cancelled,
            EntryStatus::Reversed,
        ] {
            assert_eq!(EntryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EntryStatus::parse("unknown"), None);
        assert_eq!(EntryDirection::parse("receita"), Some(EntryDirection::Revenue));
    }

    #[test]
    fn test_active_statuses() {
        assert!(EntryStatus::Pending.is_active());
        assert!(EntryStatus::Confirmed.is_active());
        assert!(!EntryStatus::Cancelled.is_active());
        assert!(!EntryStatus::Reversed.is_active());
    }

    #[test]
    fn test_matching_date_prefers_effective() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let effective = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let mut entry = LedgerEntry {
            id: LedgerEntryId::new(),
            installment_id: None,
            description: "honorarios".into(),
            due_date: due,
            effective_date: Some(effective),
            amount: Decimal::new(10_000, 2),
            direction: EntryDirection::Revenue,
            status: EntryStatus::Confirmed,
            reconciled: false,
        };
        assert_eq!(entry.matching_date(), effective);
        entry.effective_date = None;
        assert_eq!(entry.matching_date(), due);
    }

    #[test]
    fn test_inconsistency_kind_serializes_snake_case() {
        let json = serde_json::to_string(&InconsistencyKind::InstallmentWithoutEntry).unwrap();
        assert_eq!(json, "\"installment_without_entry\"");
    }
}
