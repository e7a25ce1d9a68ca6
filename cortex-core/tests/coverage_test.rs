use chrono::{Duration, Utc};
use std::collections::HashMap;

use cortex_core::errors::CortexError;
use cortex_core::models::{Belief, BeliefRelationship, CategoryLabel, Metadata, MemoryRecord, RelationshipType};

fn label(primary: &str) -> CategoryLabel {
    CategoryLabel {
        primary: primary.to_string(),
        secondary: None,
        tags: Default::default(),
        confidence: 0.9,
    }
}

#[test]
fn memory_record_computes_embedding_magnitude() {
    let now = Utc::now();
    let record = MemoryRecord::new(
        "m1".into(),
        "agent-1".into(),
        "I love Italian food".into(),
        label("Preference"),
        Metadata::default(),
        now,
        Some(vec![3.0, 4.0]),
    );
    assert_eq!(record.embedding_magnitude, Some(5.0));
    assert_eq!(record.last_accessed, record.created_at);
}

#[test]
fn memory_record_without_embedding_has_no_magnitude() {
    let now = Utc::now();
    let record = MemoryRecord::new(
        "m2".into(),
        "agent-1".into(),
        "no vector here".into(),
        label("Unknown"),
        Metadata::default(),
        now,
        None,
    );
    assert!(record.embedding_magnitude.is_none());
}

#[test]
fn belief_reinforcement_is_monotonic_and_counts_up() {
    let now = Utc::now();
    let mut belief = Belief::new(
        "b1".into(),
        "agent-1".into(),
        "favorite color is blue".into(),
        0.6,
        Some(label("Preference")),
        now,
        "m1".into(),
    );

    let c0 = belief.confidence;
    belief.reinforce(0.8, 0.3, now + Duration::seconds(1));
    let c1 = belief.confidence;
    belief.reinforce(0.8, 0.3, now + Duration::seconds(2));
    let c2 = belief.confidence;

    assert!(c1 > c0);
    assert!(c2 > c1);
    assert!(c2 <= 1.0);
    assert_eq!(belief.reinforcement_count, 2);
}

#[test]
fn belief_weaken_clamps_at_zero() {
    let now = Utc::now();
    let mut belief = Belief::new(
        "b2".into(),
        "agent-1".into(),
        "favorite color is blue".into(),
        0.1,
        None,
        now,
        "m1".into(),
    );
    belief.weaken(1.0, 0.2, now);
    belief.weaken(1.0, 0.2, now);
    belief.weaken(1.0, 0.2, now);
    assert_eq!(belief.confidence, 0.0);
}

#[test]
fn relationship_rejects_self_loop() {
    let now = Utc::now();
    let err = BeliefRelationship::new(
        "r1".into(),
        "b1".into(),
        "b1".into(),
        "agent-1".into(),
        RelationshipType::Supports,
        0.9,
        HashMap::new(),
        now,
    )
    .unwrap_err();
    assert!(matches!(err, CortexError::SelfReference { .. }));
}

#[test]
fn relationship_rejects_backwards_temporal_bounds() {
    let now = Utc::now();
    let relationship = BeliefRelationship::new(
        "r2".into(),
        "b1".into(),
        "b2".into(),
        "agent-1".into(),
        RelationshipType::Supersedes,
        0.9,
        HashMap::new(),
        now,
    )
    .unwrap();

    let err = relationship
        .with_temporal_bounds(Some(now), Some(now - Duration::days(1)))
        .unwrap_err();
    assert!(matches!(err, CortexError::TemporalViolation(_)));
}

#[test]
fn deprecating_relationship_types_are_closed_over_four_variants() {
    let deprecating: Vec<RelationshipType> = [
        RelationshipType::Supports,
        RelationshipType::Contradicts,
        RelationshipType::Refines,
        RelationshipType::Implies,
        RelationshipType::SimilarTo,
        RelationshipType::DerivedFrom,
        RelationshipType::RelatesTo,
        RelationshipType::Supersedes,
        RelationshipType::Updates,
        RelationshipType::Deprecates,
        RelationshipType::Replaces,
    ]
    .into_iter()
    .filter(|t| t.is_deprecating())
    .collect();

    assert_eq!(deprecating.len(), 4);
    assert!(deprecating.contains(&RelationshipType::Supersedes));
    assert!(deprecating.contains(&RelationshipType::Updates));
    assert!(deprecating.contains(&RelationshipType::Deprecates));
    assert!(deprecating.contains(&RelationshipType::Replaces));
}

#[test]
fn relationship_type_round_trips_through_as_str_and_parse() {
    for t in [
        RelationshipType::Supports,
        RelationshipType::Contradicts,
        RelationshipType::Refines,
        RelationshipType::Implies,
        RelationshipType::SimilarTo,
        RelationshipType::DerivedFrom,
        RelationshipType::RelatesTo,
        RelationshipType::Supersedes,
        RelationshipType::Updates,
        RelationshipType::Deprecates,
        RelationshipType::Replaces,
    ] {
        assert_eq!(RelationshipType::parse(t.as_str()), Some(t));
    }
}
