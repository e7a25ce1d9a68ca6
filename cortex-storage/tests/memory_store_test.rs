use std::sync::Arc;

use cortex_core::config::SimilarityConfig;
use cortex_core::models::{CategoryLabel, Metadata};
use cortex_core::traits::{MemoryStore, SimilarityQuery};
use cortex_storage::{SqliteMemoryStore, StoragePool};

fn store() -> SqliteMemoryStore {
    let pool = Arc::new(StoragePool::open_in_memory().unwrap());
    SqliteMemoryStore::new(pool, &SimilarityConfig::default()).unwrap()
}

fn category(primary: &str) -> CategoryLabel {
    CategoryLabel {
        primary: primary.to_string(),
        secondary: None,
        tags: Default::default(),
        confidence: 0.9,
    }
}

fn record(id: &str, agent: &str, content: &str, embedding: Option<Vec<f32>>) -> cortex_core::models::MemoryRecord {
    cortex_core::models::MemoryRecord::new(
        id.into(),
        agent.into(),
        content.into(),
        category("Preference"),
        Metadata::default(),
        chrono::Utc::now(),
        embedding,
    )
}

#[test]
fn put_then_get_round_trips() {
    let store = store();
    let r = record("m1", "agent-1", "I love Italian food", Some(vec![1.0, 0.0, 0.0]));
    store.put(r.clone()).unwrap();
    let fetched = store.get("m1").unwrap().unwrap();
    assert_eq!(fetched.content, r.content);
    assert_eq!(fetched.embedding_magnitude, Some(1.0));
}

#[test]
fn list_by_agent_scopes_to_agent_and_paginates() {
    let store = store();
    for i in 0..5 {
        store.put(record(&format!("m{i}"), "agent-1", "note", None)).unwrap();
    }
    store.put(record("other", "agent-2", "note", None)).unwrap();

    let page1 = store.list_by_agent("agent-1", 2, None).unwrap();
    assert_eq!(page1.items.len(), 2);
    assert!(page1.next_cursor.is_some());

    let page2 = store
        .list_by_agent("agent-1", 2, page1.next_cursor.as_deref())
        .unwrap();
    assert_eq!(page2.items.len(), 2);

    let page3 = store
        .list_by_agent("agent-1", 2, page2.next_cursor.as_deref())
        .unwrap();
    assert_eq!(page3.items.len(), 1);
    assert!(page3.next_cursor.is_none());
}

#[test]
fn search_similar_ranks_by_cosine_and_touches_access() {
    let store = store();
    store
        .put(record("m1", "agent-1", "favorite food", Some(vec![1.0, 0.0])))
        .unwrap();
    store
        .put(record("m2", "agent-1", "unrelated", Some(vec![0.0, 1.0])))
        .unwrap();

    let query = SimilarityQuery {
        text: None,
        vector: Some(vec![1.0, 0.0]),
    };
    let results = store.search_similar(&query, 5, Some("agent-1"), 0.5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].memory.id, "m1");

    let touched = store.get("m1").unwrap().unwrap();
    assert_eq!(touched.metadata.access_count, 1);
}

#[test]
fn archive_excludes_from_list_and_restore_brings_back() {
    let store = store();
    store.put(record("m1", "agent-1", "note", None)).unwrap();

    let archived = store.archive(&["m1".to_string()], "superseded").unwrap();
    assert_eq!(archived, 1);
    assert!(store.list_by_agent("agent-1", 10, None).unwrap().items.is_empty());

    let restored = store.restore(&["m1".to_string()]).unwrap();
    assert_eq!(restored, 1);
    assert_eq!(store.list_by_agent("agent-1", 10, None).unwrap().items.len(), 1);
}

#[test]
fn update_missing_record_is_not_found() {
    let store = store();
    let r = record("ghost", "agent-1", "note", None);
    let err = store.update(r).unwrap_err();
    assert!(matches!(err, cortex_core::CortexError::NotFound { .. }));
}
