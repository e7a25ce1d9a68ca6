use cortex_core::errors::CortexResult;
use cortex_core::models::MemoryRecord;
use cortex_core::traits::{cosine_similarity, SimilarityQuery, SimilarityResult, SimilaritySearchStrategy};

/// Ranks candidates by cosine similarity between the query vector and each
/// candidate's stored embedding. Candidates without an embedding never
/// match.
#[derive(Debug, Default)]
pub struct VectorStrategy;

impl SimilaritySearchStrategy for VectorStrategy {
    fn name(&self) -> &'static str {
        "vector"
    }

    fn supports_vector_search(&self) -> bool {
        true
    }

    fn validate_schema(&self) -> CortexResult<()> {
        Ok(())
    }

    fn initialize(&mut self) -> CortexResult<()> {
        Ok(())
    }

    fn rank(
        &self,
        query: &SimilarityQuery,
        candidates: &[MemoryRecord],
        k: usize,
        threshold: f64,
    ) -> Vec<SimilarityResult> {
        let Some(query_vector) = query.vector.as_deref() else {
            return Vec::new();
        };

        let mut scored: Vec<SimilarityResult> = candidates
            .iter()
            .filter_map(|memory| {
                let embedding = memory.embedding.as_deref()?;
                let score = cosine_similarity(query_vector, embedding);
                (score >= threshold).then(|| SimilarityResult {
                    memory: memory.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}
