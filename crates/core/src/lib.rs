//! Core business logic for Lexum.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `agreement` - Payment agreements, installments, and status derivation
//! - `distribution` - Fee splitting and installment schedule generation
//! - `settlement` - Marking installments received/paid, cancellation, overrides
//! - `disbursement` - Client-repayment workflow with declaration gating
//! - `ledger_sync` - Financial ledger projection and consistency checking
//! - `reconciliation` - Bank statement import and transaction matching
//! - `stores` - Storage contracts the engine is written against

pub mod agreement;
pub mod disbursement;
pub mod distribution;
pub mod ledger_sync;
pub mod reconciliation;
pub mod settlement;
pub mod stores;
