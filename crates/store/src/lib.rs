//! In-memory reference implementation of the engine's store contracts.
//!
//! Records persist in the wire format (camelCase JSON shapes, string
//! statuses), so every read path exercises the same decode step a real
//! backend would. The store is thread-safe behind a single `RwLock` and
//! honors the contracts' atomicity rules: batch writes are
//! all-or-nothing and reconciliation linking checks-and-inserts under
//! one write lock.
//!
//! # Modules
//!
//! - `record` - Wire-format records and domain conversions
//! - `memory` - The `RwLock`-backed store

pub mod memory;
pub mod record;

pub use memory::MemoryStore;
