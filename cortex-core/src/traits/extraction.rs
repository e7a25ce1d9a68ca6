use crate::errors::CortexResult;
use crate::models::CategoryLabel;

/// One belief statement pulled out of a memory's content by the extraction
/// provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBelief {
    pub statement: String,
    pub category: CategoryLabel,
    /// Positive (`true`) or negative (`false`) polarity of the statement —
    /// e.g. "I love X" vs "I no longer like X". Used by conflict detection
    /// alongside `ExtractionProvider::are_conflicting`.
    pub polarity: bool,
    pub confidence: f64,
    pub tags: Vec<String>,
}

/// External collaborator (C1): an AI classification/belief-extraction
/// service. Cortex only depends on this trait; the concrete model-backed
/// implementation lives outside this crate's scope. `test-fixtures` ships a
/// deterministic stand-in used by this workspace's own tests.
pub trait ExtractionProvider: Send + Sync {
    /// Classify raw memory content into a single category label. Used by
    /// the ingestion pipeline's classify step.
    fn classify(&self, content: &str) -> CortexResult<CategoryLabel>;

    /// Extract zero or more belief statements from raw memory content.
    fn extract(
        &self,
        content: &str,
        agent_id: &str,
        category: &CategoryLabel,
    ) -> CortexResult<Vec<ExtractedBelief>>;

    /// Semantic similarity between two statements, in `[0, 1]`.
    fn similarity(&self, a: &str, b: &str) -> CortexResult<f64>;

    /// Whether two statements about the same subject are in direct
    /// contradiction with one another.
    fn are_conflicting(&self, a: &str, b: &str) -> CortexResult<bool>;
}
