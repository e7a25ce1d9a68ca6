use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CortexError, CortexResult};

/// Closed enumeration of directed edge types between two beliefs of the
/// same agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Supports,
    Contradicts,
    Refines,
    Implies,
    SimilarTo,
    DerivedFrom,
    RelatesTo,
    Supersedes,
    Updates,
    Deprecates,
    Replaces,
}

impl RelationshipType {
    /// Whether this edge type is expected to carry temporal bounds in
    /// practice (it may still be created without them).
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            RelationshipType::Supersedes
                | RelationshipType::Updates
                | RelationshipType::Deprecates
                | RelationshipType::Replaces
        )
    }

    /// Whether this edge type marks its target belief as superseded by its
    /// source.
    pub fn is_deprecating(self) -> bool {
        self.is_temporal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Supports => "supports",
            RelationshipType::Contradicts => "contradicts",
            RelationshipType::Refines => "refines",
            RelationshipType::Implies => "implies",
            RelationshipType::SimilarTo => "similar_to",
            RelationshipType::DerivedFrom => "derived_from",
            RelationshipType::RelatesTo => "relates_to",
            RelationshipType::Supersedes => "supersedes",
            RelationshipType::Updates => "updates",
            RelationshipType::Deprecates => "deprecates",
            RelationshipType::Replaces => "replaces",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "supports" => RelationshipType::Supports,
            "contradicts" => RelationshipType::Contradicts,
            "refines" => RelationshipType::Refines,
            "implies" => RelationshipType::Implies,
            "similar_to" => RelationshipType::SimilarTo,
            "derived_from" => RelationshipType::DerivedFrom,
            "relates_to" => RelationshipType::RelatesTo,
            "supersedes" => RelationshipType::Supersedes,
            "updates" => RelationshipType::Updates,
            "deprecates" => RelationshipType::Deprecates,
            "replaces" => RelationshipType::Replaces,
            _ => return None,
        })
    }
}

/// A typed, optionally temporal, directed edge between two beliefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefRelationship {
    pub id: String,
    pub source_belief_id: String,
    pub target_belief_id: String,
    pub agent_id: String,
    pub relationship_type: RelationshipType,
    pub strength: f64,
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_until: Option<DateTime<Utc>>,
    pub deprecation_reason: Option<String>,
    pub priority: i64,
    pub active: bool,
    pub metadata: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl BeliefRelationship {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        source_belief_id: String,
        target_belief_id: String,
        agent_id: String,
        relationship_type: RelationshipType,
        strength: f64,
        metadata: HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> CortexResult<Self> {
        if source_belief_id == target_belief_id {
            return Err(CortexError::SelfReference {
                belief_id: source_belief_id,
            });
        }
        Ok(Self {
            id,
            source_belief_id,
            target_belief_id,
            agent_id,
            relationship_type,
            strength: strength.clamp(0.0, 1.0),
            effective_from: None,
            effective_until: None,
            deprecation_reason: None,
            priority: 0,
            active: true,
            metadata,
            created_at: now,
            last_updated: now,
        })
    }

    /// Validate and attach temporal bounds, per the `effective_from <=
    /// effective_until` invariant.
    pub fn with_temporal_bounds(
        mut self,
        effective_from: Option<DateTime<Utc>>,
        effective_until: Option<DateTime<Utc>>,
    ) -> CortexResult<Self> {
        if let (Some(from), Some(until)) = (effective_from, effective_until) {
            if from > until {
                return Err(CortexError::TemporalViolation(format!(
                    "effective_from ({from}) must be <= effective_until ({until})"
                )));
            }
        }
        self.effective_from = effective_from;
        self.effective_until = effective_until;
        Ok(self)
    }

    /// Whether this edge is in force at `at`: active, and within its
    /// temporal bounds (an unset bound is unbounded on that side).
    pub fn effective_at(&self, at: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if let Some(from) = self.effective_from {
            if at < from {
                return false;
            }
        }
        if let Some(until) = self.effective_until {
            if at > until {
                return false;
            }
        }
        true
    }
}
