//! # cortex-storage
//!
//! SQLite persistence layer for the memory and belief engine.
//! Implements `MemoryStore`, `BeliefStore`, and `RelationshipStore` from
//! `cortex-core` against a single write connection plus a WAL-mode read
//! pool, with forward-only, transactional migrations.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod similarity;
pub mod store;

pub use pool::StoragePool;
pub use store::{SqliteBeliefStore, SqliteMemoryStore, SqliteRelationshipStore};

/// Helper to convert a rusqlite error into `CortexError::StorageUnavailable`.
pub(crate) fn to_storage_err(msg: impl std::fmt::Display) -> cortex_core::CortexError {
    cortex_core::CortexError::StorageUnavailable(msg.to_string())
}
