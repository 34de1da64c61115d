//! Fee splitting and installment schedule generation.
//!
//! # Modules
//!
//! - `split` - Office/client split calculator
//! - `allocation` - Remainder-to-last amount allocation
//! - `generator` - Pure schedule generation from agreement parameters
//! - `service` - Store-facing creation and recalculation
//! - `error` - Error types for the above

pub mod allocation;
pub mod error;
pub mod generator;
pub mod service;
pub mod split;

#[cfg(test)]
mod generator_props;

pub use error::{AllocationError, DistributionError, SplitError};
pub use generator::{generate, generate_equal, InstallmentDraft};
pub use service::{CreateAgreementInput, DistributionService, RecalculateOptions};
pub use split::{SplitCalculator, SplitOutcome};
