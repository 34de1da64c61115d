//! Financial ledger projection and consistency auditing.
//!
//! # Modules
//!
//! - `types` - Ledger entry records and audit report types
//! - `service` - Installment → ledger entry synchronization
//! - `checker` - Read-only consistency audit
//! - `error` - Error types

pub mod checker;
pub mod error;
pub mod service;
pub mod types;

pub use checker::ConsistencyChecker;
pub use error::LedgerSyncError;
pub use service::{LedgerSyncService, SyncReport};
pub use types::{
    ConsistencyReport, ConsistencySummary, EntryDirection, EntryStatus, Inconsistency,
    InconsistencyKind, LedgerEntry, LedgerEntryFields,
};
