use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::models::{BeliefConflict, CategoryLabel, MemoryRecord, Metadata};
use cortex_core::traits::{ExtractionProvider, MemoryStore};
use tracing::warn;

use crate::belief_engine::BeliefEngine;

const BELIEF_RETRY_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct IngestionInput {
    pub agent_id: String,
    pub content: String,
    pub source: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<HashMap<String, String>>,
    pub embedding: Option<Vec<f32>>,
    /// Wall-clock budget for `ingest`/`dry_run_ingest`. Checked once before
    /// the memory record is persisted; exceeding it fails with `Timeout`
    /// and commits nothing.
    pub deadline: Option<Duration>,
}

impl IngestionInput {
    pub fn new(agent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            content: content.into(),
            source: None,
            timestamp: None,
            metadata: None,
            embedding: None,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStatus {
    Success,
    PartialBeliefFailure,
}

#[derive(Debug, Clone)]
pub struct IngestionResult {
    pub memory_id: String,
    pub category: CategoryLabel,
    pub encoded: bool,
    pub updated_belief_ids: Vec<String>,
    pub conflicts: Vec<BeliefConflict>,
    pub processing_millis: u64,
    pub status: IngestionStatus,
}

#[derive(Debug, Clone)]
pub struct DryRunResult {
    pub category: CategoryLabel,
    pub content_length: usize,
}

fn validate(input: &IngestionInput) -> CortexResult<()> {
    if input.agent_id.trim().is_empty() {
        return Err(CortexError::InvalidInput("agent_id must not be blank".to_string()));
    }
    if input.content.trim().is_empty() {
        return Err(CortexError::InvalidInput("content must not be empty".to_string()));
    }
    Ok(())
}

fn classify(extraction: &dyn ExtractionProvider, content: &str) -> CategoryLabel {
    match extraction.classify(content) {
        Ok(category) => category,
        Err(err) => {
            warn!(error = %err, "classification failed, falling back to Unknown category");
            CategoryLabel::unknown()
        }
    }
}

/// Validates, classifies, encodes, and triggers belief analysis for a single
/// incoming memory (C7). `ingest` is atomic per-memory: either the memory is
/// stored and belief analysis is attempted, or nothing is stored.
pub struct IngestionPipeline {
    memory_store: Arc<dyn MemoryStore>,
    extraction: Arc<dyn ExtractionProvider>,
    belief_engine: Arc<BeliefEngine>,
}

impl IngestionPipeline {
    pub fn new(
        memory_store: Arc<dyn MemoryStore>,
        extraction: Arc<dyn ExtractionProvider>,
        belief_engine: Arc<BeliefEngine>,
    ) -> Self {
        Self {
            memory_store,
            extraction,
            belief_engine,
        }
    }

    pub fn ingest(&self, input: IngestionInput) -> CortexResult<IngestionResult> {
        let started = Instant::now();
        validate(&input)?;

        let category = classify(self.extraction.as_ref(), &input.content);

        let now = input.timestamp.unwrap_or_else(Utc::now);
        let metadata = Metadata {
            source: input.source.clone(),
            extra: input.metadata.clone().unwrap_or_default(),
            ..Metadata::default()
        };

        if let Some(deadline) = input.deadline {
            if started.elapsed() >= deadline {
                return Err(CortexError::Timeout(deadline));
            }
        }

        let record = MemoryRecord::new(
            Uuid::new_v4().to_string(),
            input.agent_id.clone(),
            input.content.clone(),
            category.clone(),
            metadata,
            now,
            input.embedding.clone(),
        );
        let stored = self.memory_store.put(record)?;

        let (updated_belief_ids, conflicts, status) = match self.belief_engine.analyze_new_memory(&stored) {
            Ok(result) => (result.touched_belief_ids(), result.conflicts, IngestionStatus::Success),
            Err(CortexError::StorageUnavailable(msg)) => {
                warn!(error = %msg, "belief analysis storage unavailable, retrying once");
                thread::sleep(BELIEF_RETRY_BACKOFF);
                match self.belief_engine.analyze_new_memory(&stored) {
                    Ok(result) => (result.touched_belief_ids(), result.conflicts, IngestionStatus::Success),
                    Err(err) => {
                        warn!(error = %err, memory_id = %stored.id, "belief analysis failed after retry");
                        (Vec::new(), Vec::new(), IngestionStatus::PartialBeliefFailure)
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, memory_id = %stored.id, "belief analysis failed");
                (Vec::new(), Vec::new(), IngestionStatus::PartialBeliefFailure)
            }
        };

        Ok(IngestionResult {
            memory_id: stored.id,
            category,
            encoded: true,
            updated_belief_ids,
            conflicts,
            processing_millis: started.elapsed().as_millis() as u64,
            status,
        })
    }

    /// Validate and classify only; no persistence, no belief update.
    pub fn dry_run_ingest(&self, input: IngestionInput) -> CortexResult<DryRunResult> {
        let started = Instant::now();
        validate(&input)?;
        let category = classify(self.extraction.as_ref(), &input.content);
        if let Some(deadline) = input.deadline {
            if started.elapsed() >= deadline {
                return Err(CortexError::Timeout(deadline));
            }
        }
        Ok(DryRunResult {
            category,
            content_length: input.content.trim().len(),
        })
    }
}
