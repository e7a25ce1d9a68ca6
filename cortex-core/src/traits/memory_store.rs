use crate::errors::CortexResult;
use crate::models::MemoryRecord;
use crate::traits::similarity_strategy::{SimilarityQuery, SimilarityResult};

/// A cursor-paginated page of memories.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub items: Vec<MemoryRecord>,
    pub next_cursor: Option<String>,
}

/// Persistence contract for `MemoryRecord`s (C3). Implementations own the
/// active `SimilaritySearchStrategy` and delegate `search_similar` to it.
pub trait MemoryStore: Send + Sync {
    fn put(&self, record: MemoryRecord) -> CortexResult<MemoryRecord>;

    fn get(&self, id: &str) -> CortexResult<Option<MemoryRecord>>;

    fn get_many(&self, ids: &[String]) -> CortexResult<Vec<MemoryRecord>>;

    fn list_by_agent(
        &self,
        agent_id: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> CortexResult<MemoryPage>;

    fn update(&self, record: MemoryRecord) -> CortexResult<MemoryRecord>;

    fn delete(&self, id: &str) -> CortexResult<()>;

    /// Rank stored memories for `agent_id` (or all agents if `None`) against
    /// `query`, refreshing `last_accessed`/`access_count` on every result
    /// returned as part of this same call.
    fn search_similar(
        &self,
        query: &SimilarityQuery,
        k: usize,
        agent_id: Option<&str>,
        threshold: f64,
    ) -> CortexResult<Vec<SimilarityResult>>;

    /// Move memories into the archive partition. Archived memories are
    /// excluded from `list_by_agent`, `search_similar`, and forgetting.
    fn archive(&self, ids: &[String], reason: &str) -> CortexResult<usize>;

    /// Move memories back out of the archive partition.
    fn restore(&self, ids: &[String]) -> CortexResult<usize>;
}
