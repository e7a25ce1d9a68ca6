use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ResolutionStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConflictSeverity {
    /// Derive severity from the absolute confidence delta between the two
    /// conflicting candidates.
    pub fn from_confidence_delta(delta: f64) -> Self {
        let delta = delta.abs();
        if delta >= 0.6 {
            ConflictSeverity::Critical
        } else if delta >= 0.35 {
            ConflictSeverity::High
        } else if delta >= 0.15 {
            ConflictSeverity::Medium
        } else {
            ConflictSeverity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefConflict {
    pub id: String,
    pub agent_id: String,
    pub conflicting_belief_ids: Vec<String>,
    pub new_evidence_memory_id: Option<String>,
    pub description: String,
    pub conflict_type: String,
    pub severity: ConflictSeverity,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_strategy: Option<ResolutionStrategy>,
    pub resolution_notes: Option<String>,
    pub auto_resolvable: bool,
}

impl BeliefConflict {
    pub fn mark_resolved(
        &mut self,
        now: DateTime<Utc>,
        strategy: ResolutionStrategy,
        notes: impl Into<String>,
    ) {
        self.resolved = true;
        self.resolved_at = Some(now);
        self.resolution_strategy = Some(strategy);
        self.resolution_notes = Some(notes.into());
    }
}
