use chrono::Utc;
use cortex_core::traits::ExtractionProvider;
use test_fixtures::DeterministicExtractionProvider;

#[test]
fn classify_is_deterministic_across_calls() {
    let provider = DeterministicExtractionProvider::new();
    let a = provider.classify("I love Italian food").unwrap();
    let b = provider.classify("I love Italian food").unwrap();
    assert_eq!(a.primary, b.primary);
}

#[test]
fn extract_splits_on_clause_boundaries() {
    let provider = DeterministicExtractionProvider::new();
    let category = provider.classify("I love Italian food. I live in Chicago.").unwrap();
    let extracted = provider
        .extract("I love Italian food. I live in Chicago.", "agent-1", &category)
        .unwrap();
    assert_eq!(extracted.len(), 2);
    assert_eq!(extracted[0].statement, "I love Italian food");
    assert_eq!(extracted[1].statement, "I live in Chicago");
}

#[test]
fn similarity_of_identical_statements_is_one() {
    let provider = DeterministicExtractionProvider::new();
    let score = provider.similarity("my favorite color is blue", "my favorite color is blue").unwrap();
    assert!((score - 1.0).abs() < 1e-9);
}

#[test]
fn are_conflicting_detects_same_subject_different_value() {
    let provider = DeterministicExtractionProvider::new();
    assert!(provider
        .are_conflicting("my favorite color is blue", "my favorite color is green")
        .unwrap());
}

#[test]
fn are_conflicting_is_false_for_identical_statements() {
    let provider = DeterministicExtractionProvider::new();
    assert!(!provider
        .are_conflicting("my favorite color is blue", "my favorite color is blue")
        .unwrap());
}

#[test]
fn are_conflicting_is_false_for_unrelated_statements() {
    let provider = DeterministicExtractionProvider::new();
    assert!(!provider
        .are_conflicting("my favorite color is blue", "I live in Denver")
        .unwrap());
}

#[test]
fn builders_produce_well_formed_records() {
    let now = Utc::now();
    let m = test_fixtures::memory("m1", "agent-1", "I love Italian food", now);
    assert_eq!(m.agent_id, "agent-1");
    let b = test_fixtures::belief("b1", "agent-1", "I love Italian food", 0.8, now, "m1");
    assert!(b.evidence_memory_ids.contains("m1"));
}
