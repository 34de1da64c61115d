//! Client repayment (repasse) workflow with declaration gating.
//!
//! # Modules
//!
//! - `service` - Declaration attachment, transfer registration, queue
//! - `error` - Error types

pub mod error;
pub mod service;

pub use error::DisbursementError;
pub use service::{DisbursementInput, DisbursementService, PendingDisbursementFilter};
