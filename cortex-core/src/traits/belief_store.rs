use std::collections::HashMap;

use crate::errors::CortexResult;
use crate::models::{Belief, BeliefConflict};
use crate::traits::ExtractionProvider;

/// Persistence + aggregation contract for beliefs and conflicts (C4).
/// Aggregation methods exist so callers never have to load the full set of
/// an agent's beliefs just to answer a count or a threshold filter.
pub trait BeliefStore: Send + Sync {
    fn put(&self, belief: Belief) -> CortexResult<Belief>;

    fn get(&self, id: &str) -> CortexResult<Option<Belief>>;

    fn find_by_agent_and_category(
        &self,
        agent_id: &str,
        category_primary: &str,
    ) -> CortexResult<Vec<Belief>>;

    fn store_batch(&self, beliefs: &[Belief]) -> CortexResult<Vec<Belief>>;

    fn count_by_agent(&self, agent_id: &str, include_inactive: bool) -> CortexResult<u64>;

    fn count_by_category(&self, agent_id: &str) -> CortexResult<HashMap<String, u64>>;

    fn find_low_confidence(
        &self,
        agent_id: Option<&str>,
        threshold: f64,
    ) -> CortexResult<Vec<Belief>>;

    /// Ranked by `confidence` descending.
    fn search_by_text(&self, agent_id: Option<&str>, q: &str) -> CortexResult<Vec<Belief>>;

    /// Beliefs whose semantic similarity to `statement` (per `extraction`)
    /// meets `threshold`, ranked descending and capped at `k`. Takes the
    /// extraction provider as a parameter rather than storing one: this
    /// trait has no other use for an external collaborator, so the caller
    /// supplies it per call instead of every implementor wiring it in.
    fn find_similar(
        &self,
        statement: &str,
        agent_id: &str,
        threshold: f64,
        k: usize,
        extraction: &dyn ExtractionProvider,
    ) -> CortexResult<Vec<(Belief, f64)>>;

    fn put_conflict(&self, conflict: BeliefConflict) -> CortexResult<BeliefConflict>;

    fn get_conflict(&self, id: &str) -> CortexResult<Option<BeliefConflict>>;

    fn unresolved_conflicts(&self, agent_id: Option<&str>) -> CortexResult<Vec<BeliefConflict>>;
}
