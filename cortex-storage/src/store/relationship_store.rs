use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cortex_core::config::DuplicateEdgePolicy;
use cortex_core::errors::CortexResult;
use cortex_core::models::{BeliefRelationship, RelationshipType};
use cortex_core::traits::{GraphStatistics, RelationshipStore};
use cortex_graph::LiveSubgraph;

use crate::queries::relationship_ops;
use crate::StoragePool;

pub struct SqliteRelationshipStore {
    pool: Arc<StoragePool>,
    duplicate_edge_policy: DuplicateEdgePolicy,
}

impl SqliteRelationshipStore {
    pub fn new(pool: Arc<StoragePool>) -> Self {
        Self::with_policy(pool, DuplicateEdgePolicy::default())
    }

    pub fn with_policy(pool: Arc<StoragePool>, duplicate_edge_policy: DuplicateEdgePolicy) -> Self {
        Self {
            pool,
            duplicate_edge_policy,
        }
    }
}

impl RelationshipStore for SqliteRelationshipStore {
    fn create_relationship(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        relationship_type: RelationshipType,
        strength: f64,
        agent_id: &str,
        metadata: HashMap<String, String>,
    ) -> CortexResult<BeliefRelationship> {
        let existing = self
            .pool
            .with_read(|conn| relationship_ops::find_between(conn, source_belief_id, target_belief_id, agent_id))?
            .into_iter()
            .find(|r| r.active && r.relationship_type == relationship_type);

        if let Some(existing) = existing {
            return match self.duplicate_edge_policy {
                DuplicateEdgePolicy::Reject => Err(cortex_core::CortexError::Conflict(format!(
                    "active {relationship_type:?} edge {source_belief_id}->{target_belief_id} already exists"
                ))),
                DuplicateEdgePolicy::UpgradeStrength => {
                    let upgraded_strength = existing.strength.max(strength);
                    self.pool.with_write(|conn| {
                        conn.execute(
                            "UPDATE belief_relationships SET strength = ?2 WHERE id = ?1",
                            rusqlite::params![existing.id, upgraded_strength],
                        )
                        .map_err(crate::to_storage_err)?;
                        Ok(())
                    })?;
                    Ok(BeliefRelationship {
                        strength: upgraded_strength,
                        ..existing
                    })
                }
            };
        }

        self.create_temporal(
            source_belief_id,
            target_belief_id,
            relationship_type,
            strength,
            agent_id,
            metadata,
            None,
            None,
        )
    }

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
    ) -> CortexResult<BeliefRelationship> {
        let now = Utc::now();
        let relationship = BeliefRelationship::new(
            Uuid::new_v4().to_string(),
            source_belief_id.to_string(),
            target_belief_id.to_string(),
            agent_id.to_string(),
            relationship_type,
            strength,
            metadata,
            now,
        )?
        .with_temporal_bounds(effective_from, effective_until)?;

        self.pool.with_write_tx(|conn| {
            relationship_ops::insert(conn, &relationship)?;
            Ok(())
        })?;
        Ok(relationship)
    }

    fn deprecate_belief_with(
        &self,
        old_belief_id: &str,
        new_belief_id: &str,
        reason: &str,
        agent_id: &str,
    ) -> CortexResult<BeliefRelationship> {
        let now = Utc::now();
        let mut relationship = BeliefRelationship::new(
            Uuid::new_v4().to_string(),
            new_belief_id.to_string(),
            old_belief_id.to_string(),
            agent_id.to_string(),
            RelationshipType::Supersedes,
            1.0,
            HashMap::new(),
            now,
        )?
        .with_temporal_bounds(Some(now), None)?;
        relationship.deprecation_reason = Some(reason.to_string());

        self.pool.with_write_tx(|conn| {
            relationship_ops::insert(conn, &relationship)?;

            let still_supported = !relationship_ops::find_incoming(conn, old_belief_id, agent_id)?
                .into_iter()
                .filter(|r| r.id != relationship.id && r.active)
                .any(|r| !r.relationship_type.is_deprecating());

            if still_supported {
                conn.execute(
                    "UPDATE beliefs SET active = 0 WHERE id = ?1",
                    rusqlite::params![old_belief_id],
                )
                .map_err(crate::to_storage_err)?;
            }
            Ok(())
        })?;

        Ok(relationship)
    }

    fn find_by_id(&self, id: &str) -> CortexResult<Option<BeliefRelationship>> {
        self.pool.with_read(|conn| relationship_ops::find_by_id(conn, id))
    }

    fn find_by_belief(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_by_belief(conn, belief_id, agent_id))
    }

    fn find_outgoing(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_outgoing(conn, belief_id, agent_id))
    }

    fn find_incoming(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_incoming(conn, belief_id, agent_id))
    }

    fn find_by_type(
        &self,
        agent_id: &str,
        relationship_type: RelationshipType,
    ) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_by_type(conn, agent_id, relationship_type))
    }

    fn find_between(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        agent_id: &str,
    ) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_between(conn, source_belief_id, target_belief_id, agent_id))
    }

    fn find_deprecating(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_deprecating(conn, belief_id, agent_id))
    }

    fn find_currently_effective(
        &self,
        agent_id: &str,
        now: DateTime<Utc>,
    ) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_currently_effective(conn, agent_id, now))
    }

    fn find_high_strength(&self, agent_id: &str, threshold: f64) -> CortexResult<Vec<BeliefRelationship>> {
        self.pool
            .with_read(|conn| relationship_ops::find_high_strength(conn, agent_id, threshold))
    }

    fn deactivate(&self, id: &str) -> CortexResult<()> {
        self.pool.with_write(|conn| relationship_ops::deactivate(conn, id))
    }

    fn reactivate(&self, id: &str) -> CortexResult<()> {
        self.pool.with_write(|conn| relationship_ops::reactivate(conn, id))
    }

    fn delete(&self, id: &str) -> CortexResult<()> {
        self.pool.with_write(|conn| relationship_ops::delete(conn, id))
    }

    fn find_related_belief_ids(
        &self,
        start_id: &str,
        agent_id: &str,
        max_depth: usize,
    ) -> CortexResult<Vec<String>> {
        let edges = self.pool.with_read(|conn| relationship_ops::live_edges(conn, agent_id, Utc::now()))?;
        let subgraph = LiveSubgraph::build(&edges);
        cortex_graph::find_related_belief_ids(&subgraph, start_id, max_depth, 10_000)
    }

    fn find_shortest_path(
        &self,
        source_belief_id: &str,
        target_belief_id: &str,
        agent_id: &str,
    ) -> CortexResult<Vec<BeliefRelationship>> {
        let edges = self.pool.with_read(|conn| relationship_ops::live_edges(conn, agent_id, Utc::now()))?;
        let subgraph = LiveSubgraph::build(&edges);
        let relationship_ids =
            cortex_graph::find_shortest_path(&subgraph, source_belief_id, target_belief_id, 10_000)?;

        let by_id: HashMap<&str, &BeliefRelationship> =
            edges.iter().map(|e| (e.id.as_str(), e)).collect();
        Ok(relationship_ids
            .into_iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|r| (*r).clone()))
            .collect())
    }

    fn find_belief_clusters(
        &self,
        agent_id: &str,
        strength_threshold: f64,
    ) -> CortexResult<HashMap<usize, HashSet<String>>> {
        let edges = self.pool.with_read(|conn| relationship_ops::live_edges(conn, agent_id, Utc::now()))?;
        Ok(cortex_graph::find_belief_clusters(&edges, strength_threshold))
    }

    fn find_deprecation_chain(&self, belief_id: &str, agent_id: &str) -> CortexResult<Vec<String>> {
        let edges = self.pool.with_read(|conn| relationship_ops::all_edges(conn, agent_id))?;
        Ok(cortex_graph::find_deprecation_chain(&edges, belief_id))
    }

    fn find_potential_conflicts(&self, agent_id: &str) -> CortexResult<Vec<(String, String)>> {
        let edges = self.pool.with_read(|conn| relationship_ops::find_by_type(
            conn,
            agent_id,
            RelationshipType::Contradicts,
        ))?;
        Ok(edges
            .into_iter()
            .map(|r| (r.source_belief_id, r.target_belief_id))
            .collect())
    }

    fn get_comprehensive_graph_statistics(&self, agent_id: &str) -> CortexResult<GraphStatistics> {
        self.pool
            .with_read(|conn| relationship_ops::graph_statistics(conn, agent_id))
    }

    fn validate_graph_structure(&self, agent_id: &str) -> CortexResult<Vec<String>> {
        self.pool
            .with_read(|conn| relationship_ops::validate_graph_structure(conn, agent_id))
    }
}
