use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CategoryLabel;

/// Fixed metadata fields every memory carries, plus a free-form extension
/// map for anything a caller wants to attach without a schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub source: Option<String>,
    pub importance: f64,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub extra: HashMap<String, String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            source: None,
            importance: 0.5,
            access_count: 0,
            last_accessed: None,
            extra: HashMap::new(),
        }
    }
}

/// One ingested observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub agent_id: String,
    pub content: String,
    pub category: CategoryLabel,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub relevance_score: Option<f64>,
    pub version: u64,
    pub embedding: Option<Vec<f32>>,
    pub embedding_magnitude: Option<f64>,
}

impl MemoryRecord {
    /// Build a new record, computing `embedding_magnitude` from `embedding`
    /// if one is supplied, per the invariant in the data model.
    pub fn new(
        id: String,
        agent_id: String,
        content: String,
        category: CategoryLabel,
        metadata: Metadata,
        created_at: DateTime<Utc>,
        embedding: Option<Vec<f32>>,
    ) -> Self {
        let embedding_magnitude = embedding.as_ref().map(|v| l2_norm(v));
        Self {
            id,
            agent_id,
            content,
            category,
            metadata,
            created_at,
            last_accessed: created_at,
            relevance_score: None,
            version: 1,
            embedding,
            embedding_magnitude,
        }
    }

    /// Recompute `embedding_magnitude` to match `embedding`. Call after any
    /// mutation of `embedding` to keep the two fields consistent.
    pub fn recompute_embedding_magnitude(&mut self) {
        self.embedding_magnitude = self.embedding.as_ref().map(|v| l2_norm(v));
    }
}

pub(crate) fn l2_norm(v: &[f32]) -> f64 {
    (v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>()).sqrt()
}
