use std::collections::HashMap;
use std::sync::Arc;

use cortex_core::models::Belief;
use cortex_core::traits::{BeliefStore, RelationshipStore};
use cortex_storage::{SqliteBeliefStore, SqliteRelationshipStore, StoragePool};

fn pool() -> Arc<StoragePool> {
    Arc::new(StoragePool::open_in_memory().unwrap())
}

fn belief(id: &str, agent: &str, statement: &str, confidence: f64) -> Belief {
    Belief::new(
        id.into(),
        agent.into(),
        statement.into(),
        confidence,
        None,
        chrono::Utc::now(),
        format!("evidence-for-{id}"),
    )
}

#[test]
fn belief_put_then_get_round_trips_evidence_and_tags() {
    let belief_store = SqliteBeliefStore::new(pool());
    let mut b = belief("b1", "agent-1", "favorite color is blue", 0.8);
    b.tags.insert("preference".into());
    b.evidence_memory_ids.insert("m2".into());

    belief_store.put(b.clone()).unwrap();
    let fetched = belief_store.get("b1").unwrap().unwrap();
    assert_eq!(fetched.statement, b.statement);
    assert!(fetched.tags.contains("preference"));
    assert!(fetched.evidence_memory_ids.contains("m2"));
}

#[test]
fn low_confidence_filter_excludes_inactive_above_threshold() {
    let belief_store = SqliteBeliefStore::new(pool());
    belief_store.put(belief("b1", "agent-1", "shaky claim", 0.1)).unwrap();
    belief_store.put(belief("b2", "agent-1", "solid claim", 0.9)).unwrap();

    let low = belief_store.find_low_confidence(Some("agent-1"), 0.5).unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, "b1");
}

#[test]
fn relationship_rejects_duplicate_self_reference_before_hitting_storage() {
    let p = pool();
    let relationships = SqliteRelationshipStore::new(p);
    let err = relationships
        .create_relationship(
            "b1",
            "b1",
            cortex_core::models::RelationshipType::Supports,
            0.9,
            "agent-1",
            HashMap::new(),
        )
        .unwrap_err();
    assert!(matches!(err, cortex_core::CortexError::SelfReference { .. }));
}

#[test]
fn deprecate_belief_with_creates_supersedes_edge_and_deactivates_old() {
    let p = pool();
    let beliefs = SqliteBeliefStore::new(p.clone());
    let relationships = SqliteRelationshipStore::new(p);

    beliefs.put(belief("old", "agent-1", "I live in Chicago", 0.8)).unwrap();
    beliefs.put(belief("new", "agent-1", "I live in Denver", 0.9)).unwrap();

    let edge = relationships
        .deprecate_belief_with("old", "new", "moved", "agent-1")
        .unwrap();

    assert_eq!(edge.relationship_type, cortex_core::models::RelationshipType::Supersedes);
    assert_eq!(edge.source_belief_id, "new");
    assert_eq!(edge.target_belief_id, "old");

    let deprecating = relationships.find_deprecating("old", "agent-1").unwrap();
    assert_eq!(deprecating.len(), 1);
}

#[test]
fn graph_statistics_reflect_live_edges() {
    let p = pool();
    let beliefs = SqliteBeliefStore::new(p.clone());
    let relationships = SqliteRelationshipStore::new(p);

    for id in ["a", "b", "c"] {
        beliefs.put(belief(id, "agent-1", "statement", 0.7)).unwrap();
    }
    relationships
        .create_relationship(
            "a",
            "b",
            cortex_core::models::RelationshipType::Supports,
            0.8,
            "agent-1",
            HashMap::new(),
        )
        .unwrap();

    let stats = relationships.get_comprehensive_graph_statistics("agent-1").unwrap();
    assert_eq!(stats.belief_count, 3);
    assert_eq!(stats.edge_count, 1);
    assert_eq!(stats.isolated_belief_count, 1);
}

#[test]
fn find_similar_ranks_by_score_and_respects_threshold_and_k() {
    let belief_store = SqliteBeliefStore::new(pool());
    let extraction = test_fixtures::DeterministicExtractionProvider::new();

    belief_store.put(belief("b1", "agent-1", "my favorite color is blue", 0.8)).unwrap();
    belief_store.put(belief("b2", "agent-1", "favorite color is blue indeed", 0.8)).unwrap();
    belief_store.put(belief("b3", "agent-1", "lives in Denver", 0.8)).unwrap();

    let found = belief_store
        .find_similar("favorite color is blue", "agent-1", 0.2, 2, &extraction)
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].0.id, "b1");
    assert_eq!(found[1].0.id, "b2");
}

#[test]
fn validate_graph_structure_reports_orphan_evidence() {
    let p = pool();
    let beliefs = SqliteBeliefStore::new(p.clone());
    let relationships = SqliteRelationshipStore::new(p.clone());

    let mut b = belief("b1", "agent-1", "statement", 0.7);
    b.evidence_memory_ids.insert("missing-memory".into());
    beliefs.put(b).unwrap();

    let problems = relationships.validate_graph_structure("agent-1").unwrap();
    assert!(problems.iter().any(|p| p.contains("missing-memory")));
}

#[test]
fn validate_graph_structure_reports_duplicate_active_edges() {
    let p = pool();
    let beliefs = SqliteBeliefStore::new(p.clone());
    let relationships = SqliteRelationshipStore::new(p.clone());

    beliefs.put(belief("a", "agent-1", "statement a", 0.7)).unwrap();
    beliefs.put(belief("b", "agent-1", "statement b", 0.7)).unwrap();

    relationships
        .create_temporal(
            "a",
            "b",
            cortex_core::models::RelationshipType::Supports,
            0.8,
            "agent-1",
            HashMap::new(),
            None,
            None,
        )
        .unwrap();
    relationships
        .create_temporal(
            "a",
            "b",
            cortex_core::models::RelationshipType::Supports,
            0.6,
            "agent-1",
            HashMap::new(),
            None,
            None,
        )
        .unwrap();

    let problems = relationships.validate_graph_structure("agent-1").unwrap();
    assert!(problems.iter().any(|p| p.contains("active") && p.contains("edges between a and b")));
}
