//! Bank transaction and reconciliation types.

use chrono::{DateTime, NaiveDate, Utc};
use lexum_shared::types::{BankTransactionId, LedgerEntryId, ReconciliationId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger_sync::types::{EntryDirection, LedgerEntry};

/// Direction of a bank transaction relative to the office account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDirection {
    /// Money in (`credito`).
    #[serde(rename = "credito")]
    Credit,
    /// Money out (`debito`).
    #[serde(rename = "debito")]
    Debit,
}

impl TransactionDirection {
    /// Returns the wire representation of the direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credito",
            Self::Debit => "debito",
        }
    }

    /// Parses a direction from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credito" => Some(Self::Credit),
            "debito" => Some(Self::Debit),
            _ => None,
        }
    }

    /// The ledger direction this transaction direction can match: money
    /// in matches revenue, money out matches expense.
    #[must_use]
    pub fn matching_entry_direction(&self) -> EntryDirection {
        match self {
            Self::Credit => EntryDirection::Revenue,
            Self::Debit => EntryDirection::Expense,
        }
    }
}

impl fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciliation status of a bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationStatus {
    /// Not yet matched (`pendente`).
    #[serde(rename = "pendente")]
    Pending,
    /// The automatic pass found candidates below the auto-apply
    /// threshold (`sugerida`).
    #[serde(rename = "sugerida")]
    Suggested,
    /// Linked to a ledger entry (`conciliada`).
    #[serde(rename = "conciliada")]
    Reconciled,
}

impl ReconciliationStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Suggested => "sugerida",
            Self::Reconciled => "conciliada",
        }
    }

    /// Parses a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(Self::Pending),
            "sugerida" => Some(Self::Suggested),
            "conciliada" => Some(Self::Reconciled),
            _ => None,
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reconciliation link was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationKind {
    /// A user picked the match (`manual`).
    #[serde(rename = "manual")]
    Manual,
    /// The automatic pass applied a high-confidence match
    /// (`automatica`).
    #[serde(rename = "automatica")]
    Automatic,
}

impl ReconciliationKind {
    /// Returns the wire representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatica",
        }
    }

    /// Parses a kind from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "automatica" => Some(Self::Automatic),
            _ => None,
        }
    }
}

/// One imported bank statement transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Unique identifier.
    pub id: BankTransactionId,
    /// Date of the movement on the statement.
    pub date: NaiveDate,
    /// Statement description line.
    pub description: String,
    /// Amount, always positive; the direction carries the sign.
    pub amount: Decimal,
    /// Money in or out.
    pub direction: TransactionDirection,
    /// Matching state.
    pub status: ReconciliationStatus,
}

/// The link between one bank transaction and one ledger entry.
///
/// At most one active reconciliation exists per transaction and per
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Unique identifier.
    pub id: ReconciliationId,
    /// The bank side of the link.
    pub transaction_id: BankTransactionId,
    /// The ledger side of the link.
    pub entry_id: LedgerEntryId,
    /// Manual or automatic.
    pub kind: ReconciliationKind,
    /// Who created the link, when known.
    pub created_by: Option<UserId>,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

/// One already-normalized statement line handed to the engine.
///
/// Parsing OFX/CSV statement files is an external producer's job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatementLine {
    /// Date of the movement.
    pub date: NaiveDate,
    /// Statement description.
    pub description: String,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Money in or out.
    pub direction: TransactionDirection,
}

/// One scored candidate for a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The candidate ledger entry.
    pub entry: LedgerEntry,
    /// Composite similarity score in `[0, 1]`.
    pub score: Decimal,
    /// Amount closeness component.
    pub amount_score: Decimal,
    /// Date proximity component.
    pub date_score: Decimal,
    /// Description similarity component.
    pub text_score: Decimal,
}

/// One auto-applied match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMatch {
    /// The reconciled transaction.
    pub transaction_id: BankTransactionId,
    /// The entry it was linked to.
    pub entry_id: LedgerEntryId,
}

/// Outcome of one automatic reconciliation pass.
///
/// The pass checkpoints per transaction: one failure is recorded here
/// and the pass continues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoReconcileReport {
    /// Matches applied at or above the confidence threshold.
    pub applied: Vec<AppliedMatch>,
    /// Transactions whose best candidate scored below the threshold.
    pub below_threshold: Vec<BankTransactionId>,
    /// Transactions with no candidate at all.
    pub no_candidates: Vec<BankTransactionId>,
    /// Transactions that failed mid-apply, with the failure message.
    pub failures: Vec<(BankTransactionId, String)>,
}
