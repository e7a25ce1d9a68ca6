use std::sync::{Arc, Mutex};

use chrono::Utc;

use cortex_core::config::{SimilarityConfig, VectorStrategyMode};
use cortex_core::errors::CortexResult;
use cortex_core::models::MemoryRecord;
use cortex_core::traits::{MemoryPage, MemoryStore, SimilarityQuery, SimilarityResult, SimilaritySearchStrategy};

use crate::queries::memory_ops;
use crate::similarity::{AutoStrategy, TextStrategy, VectorStrategy};
use crate::StoragePool;

/// `MemoryStore` over a `StoragePool`, delegating ranking to whichever
/// `SimilaritySearchStrategy` the similarity config selects.
pub struct SqliteMemoryStore {
    pool: Arc<StoragePool>,
    strategy: Mutex<Box<dyn SimilaritySearchStrategy>>,
}

impl SqliteMemoryStore {
    pub fn new(pool: Arc<StoragePool>, config: &SimilarityConfig) -> CortexResult<Self> {
        let mut strategy: Box<dyn SimilaritySearchStrategy> = match config.vector_strategy {
            VectorStrategyMode::Auto => Box::new(AutoStrategy::default()),
            VectorStrategyMode::Vector => Box::new(VectorStrategy),
            VectorStrategyMode::Text => Box::new(TextStrategy),
        };
        strategy.initialize()?;
        strategy.validate_schema()?;
        Ok(Self {
            pool,
            strategy: Mutex::new(strategy),
        })
    }
}

impl MemoryStore for SqliteMemoryStore {
    fn put(&self, record: MemoryRecord) -> CortexResult<MemoryRecord> {
        self.pool.with_write(|conn| {
            memory_ops::insert(conn, &record)?;
            Ok(record)
        })
    }

    fn get(&self, id: &str) -> CortexResult<Option<MemoryRecord>> {
        self.pool.with_read(|conn| memory_ops::get(conn, id))
    }

    fn get_many(&self, ids: &[String]) -> CortexResult<Vec<MemoryRecord>> {
        self.pool.with_read(|conn| memory_ops::get_many(conn, ids))
    }

    fn list_by_agent(
        &self,
        agent_id: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> CortexResult<MemoryPage> {
        self.pool
            .with_read(|conn| memory_ops::list_by_agent(conn, agent_id, limit, cursor))
    }

    fn update(&self, record: MemoryRecord) -> CortexResult<MemoryRecord> {
        self.pool.with_write(|conn| {
            let updated = memory_ops::update(conn, &record)?;
            if !updated {
                return Err(cortex_core::CortexError::NotFound {
                    kind: "memory",
                    id: record.id.clone(),
                });
            }
            Ok(record)
        })
    }

    fn delete(&self, id: &str) -> CortexResult<()> {
        self.pool.with_write(|conn| memory_ops::delete(conn, id))
    }

    fn search_similar(
        &self,
        query: &SimilarityQuery,
        k: usize,
        agent_id: Option<&str>,
        threshold: f64,
    ) -> CortexResult<Vec<SimilarityResult>> {
        let candidates = self
            .pool
            .with_read(|conn| memory_ops::candidates_for_search(conn, agent_id))?;

        let results = {
            let strategy = self
                .strategy
                .lock()
                .map_err(|_| cortex_core::CortexError::Internal("similarity strategy mutex poisoned".into()))?;
            strategy.rank(query, &candidates, k, threshold)
        };

        if !results.is_empty() {
            let now = Utc::now().to_rfc3339();
            self.pool.with_write_tx(|conn| {
                for result in &results {
                    memory_ops::touch_access(conn, &result.memory.id, &now)?;
                }
                Ok(())
            })?;
        }

        Ok(results)
    }

    fn archive(&self, ids: &[String], reason: &str) -> CortexResult<usize> {
        let now = Utc::now().to_rfc3339();
        self.pool
            .with_write_tx(|conn| memory_ops::archive(conn, ids, reason, &now))
    }

    fn restore(&self, ids: &[String]) -> CortexResult<usize> {
        self.pool.with_write_tx(|conn| memory_ops::restore(conn, ids))
    }
}
