//! # cortex-core
//!
//! Shared domain model, error types, configuration, and trait contracts for
//! the Cortex agent memory and belief engine. This crate has no storage or
//! orchestration logic of its own — it is the vocabulary the other crates
//! build on.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{CortexError, CortexResult};
