//! Relationship graph engine subsystem configuration.

use serde::{Deserialize, Serialize};

/// What happens when `create_relationship` is asked to create an edge that
/// duplicates an existing active `(source, target, type, agent)` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEdgePolicy {
    /// Raise the existing edge's strength to max(existing, requested) and
    /// return the updated edge instead of creating a new one.
    UpgradeStrength,
    /// Reject with `CortexError::Conflict`.
    Reject,
}

impl Default for DuplicateEdgePolicy {
    fn default() -> Self {
        DuplicateEdgePolicy::UpgradeStrength
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub snapshot_cap: usize,
    pub max_traversal_nodes: usize,
    pub duplicate_edge_policy: DuplicateEdgePolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            snapshot_cap: 1000,
            max_traversal_nodes: 10_000,
            duplicate_edge_policy: DuplicateEdgePolicy::UpgradeStrength,
        }
    }
}
