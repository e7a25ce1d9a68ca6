use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::errors::CortexResult;
use crate::models::{BeliefRelationship, RelationshipType};

/// Aggregate counts for an agent's belief graph, computed entirely through
/// storage-level aggregation queries — never by materializing the full
/// graph in memory.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphStatistics {
    pub belief_count: u64,
    pub active_belief_count: u64,
    pub edge_count: u64,
    pub avg_strength: f64,
    pub deprecated_count: u64,
    pub isolated_belief_count: u64,
    pub max_fan_out: u64,
    /// `edge_count / (belief_count * (belief_count - 1))`, 0 if fewer than
    /// two beliefs.
    pub density: f64,
}

/// Persistence + traversal contract for the typed, temporal belief
/// relationship graph (C5).
pub trait RelationshipStore: Send + Sync {
    fn create_relationship(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        relationship_type: RelationshipType,
        strength: f64,
        agent_id: &str,
        metadata: HashMap<String, String>,
    ) -> CortexResult<BeliefRelationship>;

    #[allow(clippy::too_many_arguments)]
    fn create_temporal(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        relationship_type: RelationshipType,
        strength: f64,
        agent_id: &str,
        metadata: HashMap<String, String>,
        effective_from: Option<DateTime<Utc>>,
        effective_until: Option<DateTime<Utc>>,
    ) -> CortexResult<BeliefRelationship>;

    /// Create a `Supersedes` edge `new -> old` with `effective_from = now`
    /// and, in the same transaction, flip `old`'s `active` to false if no
    /// other supporting live evidence remains.
    fn deprecate_belief_with(
        &self,
        old_belief_id: &str,
        new_belief_id: &str,
        reason: &str,
        agent_id: &str,
    ) -> CortexResult<BeliefRelationship>;

    fn find_by_id(&self, id: &str) -> CortexResult<Option<BeliefRelationship>>;

    fn find_by_belief(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_outgoing(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_incoming(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_by_type(
        &self,
        agent_id: &str,
        relationship_type: RelationshipType,
    ) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_between(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        agent_id: &str,
    ) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_deprecating(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_currently_effective(
        &self,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_high_strength(&self, agent_id: &str, threshold: f64) -> CortexResult<Vec<BeliefRelationship>>;

    fn deactivate(&self, id: &str) -> CortexResult<()>;

    fn reactivate(&self, id: &str) -> CortexResult<()>;

    fn delete(&self, id: &str) -> CortexResult<()>;

    // --- Graph operations (cortex-graph algorithms, over a live subgraph) ---

    fn find_related_belief_ids(
        &self,
        start_id: &str,
        agent_id: &str,
        max_depth: usize,
    ) -> CortexResult<Vec<String>>;

    fn find_shortest_path(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        agent_id: &str,
    ) -> CortexResult<Vec<BeliefRelationship>>;

    fn find_belief_clusters(
        &self,
        agent_id: &str,
        strength_threshold: f64,
    ) -> CortexResult<HashMap<usize, HashSet<String>>>;

    fn find_deprecation_chain(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<String>>;

    fn find_potential_conflicts(&self, agent_id: &str) -> CortexResult<Vec<(String, String)>>;

    fn get_comprehensive_graph_statistics(&self, agent_id: &str) -> CortexResult<GraphStatistics>;

    fn validate_graph_structure(&self, agent_id: &str) -> CortexResult<Vec<String>>;
}
