use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};

use cortex_core::config::{BeliefConfig, ForgettingConfig, GraphConfig, SimilarityConfig};
use cortex_core::models::RelationshipType;
use cortex_core::traits::{BeliefStore, ExtractionProvider, ForgettingStrategy, MemoryStore, RelationshipStore, SimilarityQuery};
use cortex_engine::{
    BeliefEngine, GraphViewAssembler, IngestionInput, IngestionPipeline, IngestionStatus, RelevanceForgettingEngine,
};
use cortex_storage::{SqliteBeliefStore, SqliteMemoryStore, SqliteRelationshipStore, StoragePool};
use test_fixtures::DeterministicExtractionProvider;

struct Env {
    pipeline: IngestionPipeline,
    belief_engine: Arc<BeliefEngine>,
    memory_store: Arc<dyn MemoryStore>,
    belief_store: Arc<dyn BeliefStore>,
    relationship_store: Arc<dyn RelationshipStore>,
}

fn env_with_config(belief_config: BeliefConfig) -> Env {
    let pool = Arc::new(StoragePool::open_in_memory().unwrap());
    let memory_store: Arc<dyn MemoryStore> =
        Arc::new(SqliteMemoryStore::new(pool.clone(), &SimilarityConfig::default()).unwrap());
    let belief_store: Arc<dyn BeliefStore> = Arc::new(SqliteBeliefStore::new(pool.clone()));
    let relationship_store: Arc<dyn RelationshipStore> = Arc::new(SqliteRelationshipStore::new(pool));
    let extraction: Arc<dyn ExtractionProvider> = Arc::new(DeterministicExtractionProvider::new());

    let belief_engine = Arc::new(BeliefEngine::new(
        belief_store.clone(),
        relationship_store.clone(),
        extraction.clone(),
        belief_config,
    ));
    let pipeline = IngestionPipeline::new(memory_store.clone(), extraction, belief_engine.clone());

    Env {
        pipeline,
        belief_engine,
        memory_store,
        belief_store,
        relationship_store,
    }
}

fn env() -> Env {
    env_with_config(BeliefConfig::default())
}

/// Scenario 1: basic ingest + reinforcement.
#[test]
fn basic_ingest_and_reinforcement() {
    let env = env();

    let first = env
        .pipeline
        .ingest(IngestionInput::new("agent-1", "I love Italian food"))
        .unwrap();
    assert_eq!(first.status, IngestionStatus::Success);
    assert_eq!(first.updated_belief_ids.len(), 1);

    let belief_id = first.updated_belief_ids[0].clone();
    let belief = env.belief_store.get(&belief_id).unwrap().unwrap();
    assert_eq!(belief.reinforcement_count, 0);
    let original_confidence = belief.confidence;

    let second = env
        .pipeline
        .ingest(IngestionInput::new("agent-1", "I love Italian food"))
        .unwrap();
    assert_eq!(second.status, IngestionStatus::Success);
    assert_eq!(second.updated_belief_ids, vec![belief_id.clone()]);

    let reinforced = env.belief_store.get(&belief_id).unwrap().unwrap();
    assert_eq!(reinforced.reinforcement_count, 1);
    assert!(reinforced.confidence > original_confidence);
    assert!(reinforced.evidence_memory_ids.contains(&first.memory_id));
    assert!(reinforced.evidence_memory_ids.contains(&second.memory_id));
}

/// Scenario 2: conflict with `newer_wins` resolution.
#[test]
fn conflict_with_newer_wins() {
    // The deterministic extraction provider's Jaccard similarity scores
    // "my favorite color is blue" vs "...is green" around 0.5; lower the
    // candidate threshold so the conflict is actually detected.
    let mut config = BeliefConfig::default();
    config.reinforce_threshold = 0.4;
    let env = env_with_config(config);

    let first = env
        .pipeline
        .ingest(IngestionInput::new("agent-1", "my favorite color is blue"))
        .unwrap();
    let old_belief_id = first.updated_belief_ids[0].clone();

    let second = env
        .pipeline
        .ingest(IngestionInput::new("agent-1", "my favorite color is green"))
        .unwrap();
    assert_eq!(second.conflicts.len(), 1);
    let new_belief_id = second.updated_belief_ids[0].clone();
    assert_ne!(new_belief_id, old_belief_id);

    let old_belief = env.belief_store.get(&old_belief_id).unwrap().unwrap();
    assert!(!old_belief.active);
    let new_belief = env.belief_store.get(&new_belief_id).unwrap().unwrap();
    assert!(new_belief.active);

    let deprecating = env.relationship_store.find_deprecating(&old_belief_id, "agent-1").unwrap();
    assert_eq!(deprecating.len(), 1);
    assert_eq!(deprecating[0].relationship_type, RelationshipType::Supersedes);
    assert_eq!(deprecating[0].source_belief_id, new_belief_id);
}

/// Scenario 3: similarity retrieval scoped per agent.
#[test]
fn similarity_retrieval_scoped_per_agent() {
    let env = env();

    env.pipeline
        .ingest({
            let mut input = IngestionInput::new("agent-1", "I love Italian food");
            input.embedding = Some(vec![1.0, 0.0]);
            input
        })
        .unwrap();
    env.pipeline
        .ingest({
            let mut input = IngestionInput::new("agent-2", "I love Italian food");
            input.embedding = Some(vec![1.0, 0.0]);
            input
        })
        .unwrap();

    let query = SimilarityQuery {
        text: None,
        vector: Some(vec![1.0, 0.0]),
    };
    let results = env.memory_store.search_similar(&query, 10, Some("agent-1"), 0.5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.agent_id, "agent-1");
}

/// Scenario 4: traversal bound on a `Supports` chain of 200, `max_depth=5`.
#[test]
fn traversal_bound_on_long_chain() {
    let env = env();
    let now = Utc::now();
    for i in 0..200 {
        env.belief_store
            .put(test_fixtures::belief(&format!("b{i}"), "agent-1", &format!("statement {i}"), 0.8, now, "m0"))
            .unwrap();
    }
    for i in 0..199 {
        env.relationship_store
            .create_relationship(
                &format!("b{i}"),
                &format!("b{}", i + 1),
                RelationshipType::Supports,
                0.9,
                "agent-1",
                Default::default(),
            )
            .unwrap();
    }

    let related = env.relationship_store.find_related_belief_ids("b0", "agent-1", 5).unwrap();
    assert_eq!(related.len(), 6);
    for i in 0..=5 {
        assert!(related.contains(&format!("b{i}")));
    }
}

/// Scenario 5: forgetting with protection rules (100 memories, 5 protected).
#[test]
fn forgetting_respects_protection_rules() {
    let pool = Arc::new(StoragePool::open_in_memory().unwrap());
    let memory_store: Arc<dyn MemoryStore> =
        Arc::new(SqliteMemoryStore::new(pool.clone(), &SimilarityConfig::default()).unwrap());
    let belief_store: Arc<dyn BeliefStore> = Arc::new(SqliteBeliefStore::new(pool));

    let now = Utc::now();
    let old = now - ChronoDuration::days(400);
    for i in 0..100 {
        let mut m = test_fixtures::memory(&format!("m{i}"), "agent-1", "stale note", old);
        if i < 5 {
            m.metadata.importance = 0.95;
        }
        memory_store.put(m).unwrap();
    }

    let mut config = ForgettingConfig::default();
    config
        .protection_rules
        .insert("important".to_string(), "importance>=0.9".to_string());
    let engine = RelevanceForgettingEngine::new(memory_store.clone(), belief_store, config);

    let report = engine
        .perform_forgetting(ForgettingStrategy::Age { max_age: ChronoDuration::zero() }, "agent-1")
        .unwrap();

    assert_eq!(report.protected.len(), 5);
    assert_eq!(report.removed.len(), 95);
    for i in 0..5 {
        assert!(memory_store.get(&format!("m{i}")).unwrap().is_some());
    }
    for i in 5..100 {
        assert!(memory_store.get(&format!("m{i}")).unwrap().is_none());
    }
}

/// Scenario 6: efficient statistics parity with a full snapshot.
#[test]
fn statistics_match_manual_snapshot_count() {
    let env = env();
    let now = Utc::now();
    for id in ["a", "b", "c", "d"] {
        env.belief_store
            .put(test_fixtures::belief(id, "agent-1", "statement", 0.8, now, "m0"))
            .unwrap();
    }
    env.relationship_store
        .create_relationship("a", "b", RelationshipType::Supports, 0.9, "agent-1", Default::default())
        .unwrap();
    env.relationship_store
        .create_relationship("b", "c", RelationshipType::Supports, 0.7, "agent-1", Default::default())
        .unwrap();

    let stats = env.relationship_store.get_comprehensive_graph_statistics("agent-1").unwrap();

    let assembler = GraphViewAssembler::new(env.belief_store.as_ref(), env.relationship_store.as_ref(), GraphConfig::default());
    let snapshot = assembler.create_snapshot("agent-1", true).unwrap();

    assert_eq!(stats.belief_count as usize, snapshot.belief_count());
    assert_eq!(stats.edge_count as usize, snapshot.relationship_count());
}

/// An already-expired deadline fails `ingest` before anything is persisted.
#[test]
fn ingest_honors_expired_deadline() {
    let env = env();
    let mut input = IngestionInput::new("agent-1", "I love Italian food");
    input.deadline = Some(std::time::Duration::from_secs(0));
    std::thread::sleep(std::time::Duration::from_millis(1));

    let err = env.pipeline.ingest(input).unwrap_err();
    assert!(matches!(err, cortex_core::CortexError::Timeout(_)));

    let page = env.memory_store.list_by_agent("agent-1", 10, None).unwrap();
    assert!(page.items.is_empty());
}

/// `find_potential_conflicts` surfaces both existing `Contradicts` edges and
/// same-category pairs the extraction provider flags as conflicting but
/// which never went through `BeliefEngine::analyze_new_memory`.
#[test]
fn find_potential_conflicts_combines_edges_and_semantic_pairs() {
    let mut config = BeliefConfig::default();
    config.reinforce_threshold = 0.4;
    let env = env_with_config(config);
    let now = Utc::now();

    env.belief_store
        .put(test_fixtures::belief("blue", "agent-1", "my favorite color is blue", 0.8, now, "m0"))
        .unwrap();
    env.belief_store
        .put(test_fixtures::belief("green", "agent-1", "my favorite color is green", 0.8, now, "m1"))
        .unwrap();

    let pairs = env.belief_engine.find_potential_conflicts("agent-1").unwrap();
    assert_eq!(pairs.len(), 1);
    let (a, b) = &pairs[0];
    assert!((a == "blue" && b == "green") || (a == "green" && b == "blue"));
}
