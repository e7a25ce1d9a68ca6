use crate::errors::CortexResult;
use crate::models::MemoryRecord;

/// A retrieval query against `MemoryStore::search_similar`. Callers may
/// supply free text, a query vector, or both; strategies decide how to use
/// what they're given.
#[derive(Debug, Clone, Default)]
pub struct SimilarityQuery {
    pub text: Option<String>,
    pub vector: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub memory: MemoryRecord,
    pub score: f64,
}

/// A pluggable ranking algorithm for memory search (C2). Implementations:
/// vector cosine similarity, text substring/keyword match, and an
/// auto-detecting dispatcher between the two.
pub trait SimilaritySearchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports_vector_search(&self) -> bool;

    /// Verify the backing store exposes whatever this strategy needs
    /// (an embedding column, an FTS index, ...). Called once at
    /// construction and again after `reinitialize`.
    fn validate_schema(&self) -> CortexResult<()>;

    /// One-time setup (e.g. building an in-memory index). Idempotent.
    fn initialize(&mut self) -> CortexResult<()>;

    /// Rank `candidates` against `query`, returning at most `k` results
    /// with `score >= threshold`, highest score first.
    fn rank(
        &self,
        query: &SimilarityQuery,
        candidates: &[MemoryRecord],
        k: usize,
        threshold: f64,
    ) -> Vec<SimilarityResult>;
}

/// Cosine similarity between two vectors. Returns 0 for zero-magnitude or
/// mismatched-length inputs rather than erroring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let mag_a = (a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>()).sqrt();
    let mag_b = (b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>()).sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}
