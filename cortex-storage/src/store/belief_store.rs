use std::collections::HashMap;
use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::models::{Belief, BeliefConflict};
use cortex_core::traits::{BeliefStore, ExtractionProvider};

use crate::queries::belief_ops;
use crate::StoragePool;

pub struct SqliteBeliefStore {
    pool: Arc<StoragePool>,
}

impl SqliteBeliefStore {
    pub fn new(pool: Arc<StoragePool>) -> Self {
        Self { pool }
    }
}

impl BeliefStore for SqliteBeliefStore {
    fn put(&self, belief: Belief) -> CortexResult<Belief> {
        self.pool.with_write_tx(|conn| {
            belief_ops::put(conn, &belief)?;
            Ok(belief)
        })
    }

    fn get(&self, id: &str) -> CortexResult<Option<Belief>> {
        self.pool.with_read(|conn| belief_ops::get(conn, id))
    }

    fn find_by_agent_and_category(
        &self,
        agent_id: &str,
        category_primary: &str,
    ) -> CortexResult<Vec<Belief>> {
        self.pool
            .with_read(|conn| belief_ops::find_by_agent_and_category(conn, agent_id, category_primary))
    }

    fn store_batch(&self, beliefs: &[Belief]) -> CortexResult<Vec<Belief>> {
        self.pool.with_write_tx(|conn| {
            for belief in beliefs {
                belief_ops::put(conn, belief)?;
            }
            Ok(beliefs.to_vec())
        })
    }

    fn count_by_agent(&self, agent_id: &str, include_inactive: bool) -> CortexResult<u64> {
        self.pool
            .with_read(|conn| belief_ops::count_by_agent(conn, agent_id, include_inactive))
    }

    fn count_by_category(&self, agent_id: &str) -> CortexResult<HashMap<String, u64>> {
        self.pool.with_read(|conn| belief_ops::count_by_category(conn, agent_id))
    }

    fn find_low_confidence(&self, agent_id: Option<&str>, threshold: f64) -> CortexResult<Vec<Belief>> {
        self.pool
            .with_read(|conn| belief_ops::find_low_confidence(conn, agent_id, threshold))
    }

    fn search_by_text(&self, agent_id: Option<&str>, q: &str) -> CortexResult<Vec<Belief>> {
        self.pool.with_read(|conn| belief_ops::search_by_text(conn, agent_id, q))
    }

    fn find_similar(
        &self,
        statement: &str,
        agent_id: &str,
        threshold: f64,
        k: usize,
        extraction: &dyn ExtractionProvider,
    ) -> CortexResult<Vec<(Belief, f64)>> {
        let candidates = self
            .pool
            .with_read(|conn| belief_ops::find_active_by_agent(conn, agent_id))?;

        let mut scored = Vec::new();
        for belief in candidates {
            let score = extraction.similarity(statement, &belief.statement)?;
            if score >= threshold {
                scored.push((belief, score));
            }
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    fn put_conflict(&self, conflict: BeliefConflict) -> CortexResult<BeliefConflict> {
        self.pool.with_write_tx(|conn| {
            belief_ops::put_conflict(conn, &conflict)?;
            Ok(conflict)
        })
    }

    fn get_conflict(&self, id: &str) -> CortexResult<Option<BeliefConflict>> {
        self.pool.with_read(|conn| belief_ops::get_conflict(conn, id))
    }

    fn unresolved_conflicts(&self, agent_id: Option<&str>) -> CortexResult<Vec<BeliefConflict>> {
        self.pool.with_read(|conn| belief_ops::unresolved_conflicts(conn, agent_id))
    }
}
