use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};

use cortex_core::models::{BeliefRelationship, RelationshipType};

/// Edge payload carried in the petgraph graph: enough to reconstruct which
/// stored `BeliefRelationship` a traversal step crossed, and to order
/// neighbor visitation deterministically.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    pub relationship_id: String,
    pub strength: f64,
    pub created_at: DateTime<Utc>,
    pub relationship_type: RelationshipType,
}

/// A bounded, short-lived materialization of one agent's live belief graph:
/// edges that are `active` and `effective_at(now)`.
pub struct LiveSubgraph {
    pub(crate) graph: DiGraph<String, EdgeWeight>,
    pub(crate) index: HashMap<String, NodeIndex>,
}

impl LiveSubgraph {
    /// Build the subgraph from a caller-supplied set of already-filtered
    /// live edges (active + effective at the query time).
    pub fn build(edges: &[BeliefRelationship]) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        let mut ensure_node = |graph: &mut DiGraph<String, EdgeWeight>,
                                index: &mut HashMap<String, NodeIndex>,
                                belief_id: &str| {
            *index
                .entry(belief_id.to_string())
                .or_insert_with(|| graph.add_node(belief_id.to_string()))
        };

        for edge in edges {
            let source_idx = ensure_node(&mut graph, &mut index, &edge.source_belief_id);
            let target_idx = ensure_node(&mut graph, &mut index, &edge.target_belief_id);
            graph.add_edge(
                source_idx,
                target_idx,
                EdgeWeight {
                    relationship_id: edge.id.clone(),
                    strength: edge.strength,
                    created_at: edge.created_at,
                    relationship_type: edge.relationship_type,
                },
            );
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, belief_id: &str) -> bool {
        self.index.contains_key(belief_id)
    }
}
