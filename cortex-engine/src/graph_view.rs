use std::collections::HashSet;

use chrono::{DateTime, Utc};

use cortex_core::config::GraphConfig;
use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::models::{Belief, BeliefRelationship, RelationshipType};
use cortex_core::traits::{BeliefStore, RelationshipStore};

/// A bounded, read-only materialization of a portion of the belief graph
/// for export (C9). Pure value type: no behavior beyond simple accessors,
/// the stores own every expensive query.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphView {
    pub agent_id: String,
    pub beliefs: Vec<Belief>,
    pub relationships: Vec<BeliefRelationship>,
    pub generated_at: DateTime<Utc>,
}

impl KnowledgeGraphView {
    pub fn belief_count(&self) -> usize {
        self.beliefs.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn belief(&self, id: &str) -> Option<&Belief> {
        self.beliefs.iter().find(|b| b.id == id)
    }

    pub fn outgoing(&self, belief_id: &str) -> Vec<&BeliefRelationship> {
        self.relationships
            .iter()
            .filter(|r| r.source_belief_id == belief_id)
            .collect()
    }

    pub fn incoming(&self, belief_id: &str) -> Vec<&BeliefRelationship> {
        self.relationships
            .iter()
            .filter(|r| r.target_belief_id == belief_id)
            .collect()
    }
}

/// Builds full or filtered `KnowledgeGraphView`s from a `BeliefStore` +
/// `RelationshipStore` pair, refusing to build unbounded snapshots.
pub struct GraphViewAssembler<'a> {
    belief_store: &'a dyn BeliefStore,
    relationship_store: &'a dyn RelationshipStore,
    config: GraphConfig,
}

impl<'a> GraphViewAssembler<'a> {
    pub fn new(belief_store: &'a dyn BeliefStore, relationship_store: &'a dyn RelationshipStore, config: GraphConfig) -> Self {
        Self {
            belief_store,
            relationship_store,
            config,
        }
    }

    /// Refuses with `InvalidInput` if the agent's belief count exceeds
    /// `snapshot_cap`.
    pub fn create_snapshot(&self, agent_id: &str, include_inactive: bool) -> CortexResult<KnowledgeGraphView> {
        let count = self.belief_store.count_by_agent(agent_id, include_inactive)?;
        if count > self.config.snapshot_cap as u64 {
            return Err(CortexError::InvalidInput(format!(
                "agent {agent_id} has {count} beliefs, exceeding snapshot_cap {}; use create_filtered_snapshot",
                self.config.snapshot_cap
            )));
        }

        let categories = self.belief_store.count_by_category(agent_id)?;
        let mut beliefs = Vec::new();
        for category in categories.keys() {
            beliefs.extend(self.belief_store.find_by_agent_and_category(agent_id, category)?);
        }
        if !include_inactive {
            beliefs.retain(|b| b.active);
        }

        let now = Utc::now();
        let relationships = self.relationship_store.find_currently_effective(agent_id, now)?;

        Ok(KnowledgeGraphView {
            agent_id: agent_id.to_string(),
            beliefs,
            relationships,
            generated_at: now,
        })
    }

    /// Large-graph-safe path: restricts to an explicit set of belief ids
    /// and/or relationship types, bounded by `cap` regardless of
    /// `snapshot_cap`.
    pub fn create_filtered_snapshot(
        &self,
        agent_id: &str,
        belief_ids: &HashSet<String>,
        types: &HashSet<RelationshipType>,
        cap: usize,
    ) -> CortexResult<KnowledgeGraphView> {
        if belief_ids.len() > cap {
            return Err(CortexError::InvalidInput(format!(
                "{} requested belief ids exceed cap {cap}",
                belief_ids.len()
            )));
        }

        let mut beliefs = Vec::new();
        for id in belief_ids {
            if let Some(belief) = self.belief_store.get(id)? {
                if belief.agent_id == agent_id {
                    beliefs.push(belief);
                }
            }
        }

        let mut relationships = Vec::new();
        for id in belief_ids {
            for r in self.relationship_store.find_by_belief(id, agent_id)? {
                if types.is_empty() || types.contains(&r.relationship_type) {
                    relationships.push(r);
                }
            }
        }
        relationships.sort_by(|a, b| a.id.cmp(&b.id));
        relationships.dedup_by(|a, b| a.id == b.id);

        Ok(KnowledgeGraphView {
            agent_id: agent_id.to_string(),
            beliefs,
            relationships,
            generated_at: Utc::now(),
        })
    }
}
