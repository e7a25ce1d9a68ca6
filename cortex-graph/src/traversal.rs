use std::collections::{HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use cortex_core::{CortexError, CortexResult};

use crate::subgraph::LiveSubgraph;

/// Deterministic ordering for neighbor visitation: highest strength first,
/// then oldest edge first, then lexicographic relationship id — so two runs
/// over the same subgraph always produce the same visit order and, for
/// results truncated by `max_depth`, the same set of reached beliefs.
fn ordered_outgoing(subgraph: &LiveSubgraph, node: NodeIndex) -> Vec<(NodeIndex, String)> {
    let mut neighbors: Vec<(NodeIndex, &crate::subgraph::EdgeWeight)> = subgraph
        .graph
        .edges_directed(node, Direction::Outgoing)
        .map(|edge| (edge.target(), edge.weight()))
        .collect();

    neighbors.sort_by(|(_, a), (_, b)| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.relationship_id.cmp(&b.relationship_id))
    });

    neighbors
        .into_iter()
        .map(|(target, weight)| (target, weight.relationship_id.clone()))
        .collect()
}

/// Breadth-first traversal from `start_id`, bounded by `max_depth` hops and
/// `max_nodes_visited` total nodes. Returns the related belief ids in visit
/// order (the start node itself is excluded).
pub fn find_related_belief_ids(
    subgraph: &LiveSubgraph,
    start_id: &str,
    max_depth: usize,
    max_nodes_visited: usize,
) -> CortexResult<Vec<String>> {
    let Some(&start) = subgraph.index.get(start_id) else {
        return Ok(Vec::new());
    };

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    visited.insert(start);
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
    queue.push_back((start, 0));
    let mut result = Vec::new();

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for (neighbor, _relationship_id) in ordered_outgoing(subgraph, node) {
            if visited.contains(&neighbor) {
                continue;
            }
            if visited.len() >= max_nodes_visited {
                return Err(CortexError::TraversalLimitExceeded {
                    visited: visited.len(),
                    limit: max_nodes_visited,
                });
            }
            visited.insert(neighbor);
            result.push(subgraph.graph[neighbor].clone());
            queue.push_back((neighbor, depth + 1));
        }
    }

    Ok(result)
}

/// Shortest path (fewest hops, ties broken by the same deterministic edge
/// ordering used in traversal) from `source_id` to `target_id`. Returns the
/// relationship ids crossed, in order. Empty if source == target or
/// unreachable.
pub fn find_shortest_path(
    subgraph: &LiveSubgraph,
    source_id: &str,
    target_id: &str,
    max_nodes_visited: usize,
) -> CortexResult<Vec<String>> {
    if source_id == target_id {
        return Ok(Vec::new());
    }
    let (Some(&source), Some(&target)) = (
        subgraph.index.get(source_id),
        subgraph.index.get(target_id),
    ) else {
        return Ok(Vec::new());
    };

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    visited.insert(source);
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    queue.push_back(source);
    let mut came_from: std::collections::HashMap<NodeIndex, (NodeIndex, String)> =
        std::collections::HashMap::new();

    'search: while let Some(node) = queue.pop_front() {
        for (neighbor, relationship_id) in ordered_outgoing(subgraph, node) {
            if visited.contains(&neighbor) {
                continue;
            }
            if visited.len() >= max_nodes_visited {
                return Err(CortexError::TraversalLimitExceeded {
                    visited: visited.len(),
                    limit: max_nodes_visited,
                });
            }
            visited.insert(neighbor);
            came_from.insert(neighbor, (node, relationship_id));
            if neighbor == target {
                break 'search;
            }
            queue.push_back(neighbor);
        }
    }

    if !came_from.contains_key(&target) {
        return Ok(Vec::new());
    }

    let mut path = Vec::new();
    let mut current = target;
    while let Some((prev, relationship_id)) = came_from.get(&current) {
        path.push(relationship_id.clone());
        current = *prev;
    }
    path.reverse();
    Ok(path)
}
