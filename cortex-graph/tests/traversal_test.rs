use std::collections::HashMap;

use chrono::{Duration, Utc};

use cortex_core::models::{BeliefRelationship, RelationshipType};
use cortex_graph::{find_belief_clusters, find_deprecation_chain, find_related_belief_ids, find_shortest_path, LiveSubgraph};

fn edge(id: &str, source: &str, target: &str, t: RelationshipType, strength: f64, offset_secs: i64) -> BeliefRelationship {
    let now = Utc::now() + Duration::seconds(offset_secs);
    BeliefRelationship::new(
        id.into(),
        source.into(),
        target.into(),
        "agent-1".into(),
        t,
        strength,
        HashMap::new(),
        now,
    )
    .unwrap()
}

/// A long chain b0 -> b1 -> ... -> b199 of `supports` edges. `max_depth=5`
/// from b0 should reach exactly b1..=b5, nothing further.
fn build_chain(len: usize) -> Vec<BeliefRelationship> {
    (0..len - 1)
        .map(|i| {
            edge(
                &format!("r{i}"),
                &format!("b{i}"),
                &format!("b{}", i + 1),
                RelationshipType::Supports,
                0.9,
                i as i64,
            )
        })
        .collect()
}

#[test]
fn traversal_respects_max_depth_on_long_chain() {
    let edges = build_chain(200);
    let subgraph = LiveSubgraph::build(&edges);

    let related = find_related_belief_ids(&subgraph, "b0", 5, 10_000).unwrap();
    let expected: Vec<String> = (1..=5).map(|i| format!("b{i}")).collect();
    assert_eq!(related, expected);
}

#[test]
fn shortest_path_returns_edges_in_order() {
    let edges = build_chain(200);
    let subgraph = LiveSubgraph::build(&edges);

    let path = find_shortest_path(&subgraph, "b0", "b10", 10_000).unwrap();
    let expected: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
    assert_eq!(path, expected);
}

#[test]
fn shortest_path_is_empty_for_same_node() {
    let edges = build_chain(5);
    let subgraph = LiveSubgraph::build(&edges);
    let path = find_shortest_path(&subgraph, "b0", "b0", 1000).unwrap();
    assert!(path.is_empty());
}

#[test]
fn shortest_path_is_empty_when_unreachable() {
    let edges = vec![edge("r0", "b0", "b1", RelationshipType::Supports, 0.9, 0)];
    let subgraph = LiveSubgraph::build(&edges);
    let path = find_shortest_path(&subgraph, "b1", "b0", 1000).unwrap();
    assert!(path.is_empty());
}

#[test]
fn traversal_prefers_highest_strength_neighbor_first() {
    let edges = vec![
        edge("weak", "b0", "b1", RelationshipType::Supports, 0.2, 0),
        edge("strong", "b0", "b2", RelationshipType::Supports, 0.9, 1),
    ];
    let subgraph = LiveSubgraph::build(&edges);
    let related = find_related_belief_ids(&subgraph, "b0", 1, 1000).unwrap();
    assert_eq!(related, vec!["b2".to_string(), "b1".to_string()]);
}

#[test]
fn traversal_limit_exceeded_is_reported() {
    let edges = build_chain(50);
    let subgraph = LiveSubgraph::build(&edges);
    let result = find_related_belief_ids(&subgraph, "b0", 49, 5);
    assert!(result.is_err());
}

#[test]
fn clusters_group_by_strength_threshold_ignoring_direction() {
    let edges = vec![
        edge("r0", "b0", "b1", RelationshipType::SimilarTo, 0.8, 0),
        edge("r1", "b2", "b1", RelationshipType::SimilarTo, 0.8, 1),
        edge("r2", "b3", "b4", RelationshipType::SimilarTo, 0.1, 2),
    ];
    let clusters = find_belief_clusters(&edges, 0.5);
    assert_eq!(clusters.len(), 1);
    let cluster = clusters.values().next().unwrap();
    assert_eq!(cluster.len(), 3);
    assert!(cluster.contains("b0") && cluster.contains("b1") && cluster.contains("b2"));
}

#[test]
fn deprecation_chain_walks_inbound_supersession_edges() {
    let edges = vec![
        edge("r0", "new1", "old", RelationshipType::Supersedes, 1.0, 0),
        edge("r1", "new2", "new1", RelationshipType::Supersedes, 1.0, 1),
    ];
    let chain = find_deprecation_chain(&edges, "old");
    assert_eq!(chain, vec!["new1".to_string(), "new2".to_string()]);
}

#[test]
fn deprecation_chain_is_empty_with_no_deprecators() {
    let edges = vec![edge("r0", "b0", "b1", RelationshipType::Supports, 0.9, 0)];
    let chain = find_deprecation_chain(&edges, "b1");
    assert!(chain.is_empty());
}
