//! Settlement lifecycle: marking installments received/paid, cancelling,
//! and validating their integrity.
//!
//! # Modules
//!
//! - `service` - State transitions with optimistic concurrency
//! - `validation` - Accumulating integrity validator
//! - `error` - Error types

pub mod error;
pub mod service;
pub mod validation;

pub use error::SettlementError;
pub use service::{SettleInput, SettlementService};
pub use validation::{validate_installment, IntegrityReport, IntegrityViolation};
