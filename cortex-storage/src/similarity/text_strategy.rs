use cortex_core::errors::CortexResult;
use cortex_core::models::MemoryRecord;
use cortex_core::traits::{SimilarityQuery, SimilarityResult, SimilaritySearchStrategy};

/// Ranks candidates by keyword overlap between the query text and each
/// candidate's content, case-insensitive. The score is the fraction of
/// query words found in the content — a cheap substitute for a real text
/// index when no FTS table or embedding model is available.
#[derive(Debug, Default)]
pub struct TextStrategy;

impl SimilaritySearchStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supports_vector_search(&self) -> bool {
        false
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
        let Some(text) = query.text.as_deref() else {
            return Vec::new();
        };
        let words: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<SimilarityResult> = candidates
            .iter()
            .filter_map(|memory| {
                let content_lower = memory.content.to_lowercase();
                let matches = words.iter().filter(|w| content_lower.contains(w.as_str())).count();
                let score = matches as f64 / words.len() as f64;
                (score >= threshold).then(|| SimilarityResult {
                    memory: memory.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.memory.created_at.cmp(&a.memory.created_at))
        });
        scored.truncate(k);
        scored
    }
}
