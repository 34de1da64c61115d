//! Payment agreements and their installments.
//!
//! # Modules
//!
//! - `types` - Agreement/installment records and their status vocabularies
//! - `status` - Centralized derivation of overdue and aggregate statuses

pub mod status;
pub mod types;

#[cfg(test)]
mod status_props;

pub use status::{derive_agreement_status, installment_effective_status};
pub use types::{
    Agreement, AgreementDirection, AgreementKind, AgreementStatus, DisbursementStatus,
    DistributionMode, EffectiveInstallmentStatus, Installment, InstallmentStatus, PaymentMethod,
    RecurrenceInterval,
};
