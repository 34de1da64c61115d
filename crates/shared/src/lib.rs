//! Shared types, errors, and configuration for Lexum.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The engine-wide error taxonomy and storage error type
//! - Configuration management, including the reconciliation match policy

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, MatchPolicy};
pub use error::{ErrorKind, StoreError};
