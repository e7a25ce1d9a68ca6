use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CategoryLabel;

/// A durable statement derived from one or more memories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub id: String,
    pub agent_id: String,
    pub statement: String,
    pub confidence: f64,
    pub category: Option<CategoryLabel>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub reinforcement_count: u64,
    pub active: bool,
    pub evidence_memory_ids: HashSet<String>,
    pub tags: HashSet<String>,
    pub version: u64,
}

impl Belief {
    pub fn new(
        id: String,
        agent_id: String,
        statement: String,
        confidence: f64,
        category: Option<CategoryLabel>,
        now: DateTime<Utc>,
        first_evidence_memory_id: String,
    ) -> Self {
        let mut evidence_memory_ids = HashSet::new();
        evidence_memory_ids.insert(first_evidence_memory_id);
        Self {
            id,
            agent_id,
            statement,
            confidence: confidence.clamp(0.0, 1.0),
            category,
            created_at: now,
            last_updated: now,
            reinforcement_count: 0,
            active: true,
            evidence_memory_ids,
            tags: HashSet::new(),
            version: 1,
        }
    }

    /// Apply the reinforcement rule `c' = min(1, c + (1-c)*alpha*e)` and bump
    /// bookkeeping fields. Does not touch `evidence_memory_ids` — callers add
    /// the triggering memory id themselves so batch reinforcement can dedup.
    pub fn reinforce(&mut self, evidence_confidence: f64, alpha: f64, now: DateTime<Utc>) {
        let c = self.confidence;
        self.confidence = (c + (1.0 - c) * alpha * evidence_confidence).clamp(0.0, 1.0);
        self.reinforcement_count += 1;
        self.last_updated = now;
        self.version += 1;
    }

    /// Apply the weakening rule `c' = max(0, c - beta*e)` on contradiction.
    pub fn weaken(&mut self, evidence_confidence: f64, beta: f64, now: DateTime<Utc>) {
        self.confidence = (self.confidence - beta * evidence_confidence).clamp(0.0, 1.0);
        self.last_updated = now;
        self.version += 1;
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.last_updated = now;
        self.version += 1;
    }
}
