use std::collections::HashSet;

use cortex_core::models::BeliefRelationship;

/// Follows the chain of beliefs that (transitively) deprecate `belief_id`:
/// edges of a deprecating type (`supersedes`, `updates`, `deprecates`,
/// `replaces`) whose target is the belief in question. The result is the
/// source ids of that chain in breadth-first order — the direct deprecator
/// first, then whoever deprecated it, and so on — with cycles broken by the
/// visited set.
pub fn find_deprecation_chain(edges: &[BeliefRelationship], belief_id: &str) -> Vec<String> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(belief_id.to_string());

    let mut chain = Vec::new();
    let mut frontier = vec![belief_id.to_string()];

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();

        let mut deprecators: Vec<&BeliefRelationship> = edges
            .iter()
            .filter(|edge| {
                edge.relationship_type.is_deprecating()
                    && frontier.contains(&edge.target_belief_id)
                    && !visited.contains(&edge.source_belief_id)
            })
            .collect();

        deprecators.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        for edge in deprecators {
            if visited.insert(edge.source_belief_id.clone()) {
                chain.push(edge.source_belief_id.clone());
                next_frontier.push(edge.source_belief_id.clone());
            }
        }

        frontier = next_frontier;
    }

    chain
}
