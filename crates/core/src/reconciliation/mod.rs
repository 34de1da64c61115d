//! Bank statement import and reconciliation against the ledger.
//!
//! # Modules
//!
//! - `types` - Bank transactions, links, suggestions, reports
//! - `scoring` - Pure similarity scoring between the two sides
//! - `service` - Import, suggestion, and link management
//! - `error` - Error types

pub mod error;
pub mod scoring;
pub mod service;
pub mod types;

#[cfg(test)]
mod scoring_props;

pub use error::ReconciliationError;
pub use scoring::{score, within_window, MatchScore};
pub use service::ReconciliationService;
pub use types::{
    AppliedMatch, AutoReconcileReport, BankTransaction, Reconciliation, ReconciliationKind,
    ReconciliationStatus, StatementLine, Suggestion, TransactionDirection,
};
