//! Deterministic test doubles and builders shared across this workspace's
//! test suites. No randomness, no network, no model calls: every method is
//! a pure function of its inputs so tests stay reproducible.

mod extraction;

pub use extraction::DeterministicExtractionProvider;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use cortex_core::models::{Belief, CategoryLabel, MemoryRecord, Metadata};

pub fn category(primary: &str) -> CategoryLabel {
    CategoryLabel {
        primary: primary.to_string(),
        secondary: None,
        tags: Default::default(),
        confidence: 0.9,
    }
}

pub fn memory(id: &str, agent_id: &str, content: &str, now: DateTime<Utc>) -> MemoryRecord {
    MemoryRecord::new(
        id.to_string(),
        agent_id.to_string(),
        content.to_string(),
        category("Preference"),
        Metadata::default(),
        now,
        None,
    )
}

pub fn memory_with_embedding(
    id: &str,
    agent_id: &str,
    content: &str,
    embedding: Vec<f32>,
    now: DateTime<Utc>,
) -> MemoryRecord {
    MemoryRecord::new(
        id.to_string(),
        agent_id.to_string(),
        content.to_string(),
        category("Preference"),
        Metadata::default(),
        now,
        Some(embedding),
    )
}

pub fn belief(id: &str, agent_id: &str, statement: &str, confidence: f64, now: DateTime<Utc>, evidence_memory_id: &str) -> Belief {
    Belief::new(
        id.to_string(),
        agent_id.to_string(),
        statement.to_string(),
        confidence,
        Some(category("Preference")),
        now,
        evidence_memory_id.to_string(),
    )
}

pub fn empty_metadata_map() -> HashMap<String, String> {
    HashMap::new()
}
