use cortex_core::errors::CortexResult;
use cortex_core::models::MemoryRecord;
use cortex_core::traits::{SimilarityQuery, SimilarityResult, SimilaritySearchStrategy};

use super::{TextStrategy, VectorStrategy};

/// Dispatches to `VectorStrategy` when the query carries a vector, falling
/// back to `TextStrategy` when it only carries text. A query with both
/// prefers the vector, matching `SimilarityConfig::vector_strategy =
/// Auto`'s intent: use the richer signal when it's available.
#[derive(Debug, Default)]
pub struct AutoStrategy {
    vector: VectorStrategy,
    text: TextStrategy,
}

impl SimilaritySearchStrategy for AutoStrategy {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports_vector_search(&self) -> bool {
        true
    }

    fn validate_schema(&self) -> CortexResult<()> {
        self.vector.validate_schema()?;
        self.text.validate_schema()
    }

    fn initialize(&mut self) -> CortexResult<()> {
        self.vector.initialize()?;
        self.text.initialize()
    }

    fn rank(
        &self,
        query: &SimilarityQuery,
        candidates: &[MemoryRecord],
        k: usize,
        threshold: f64,
    ) -> Vec<SimilarityResult> {
        if query.vector.is_some() {
            self.vector.rank(query, candidates, k, threshold)
        } else {
            self.text.rank(query, candidates, k, threshold)
        }
    }
}
