//! Similarity-search subsystem configuration.

use serde::{Deserialize, Serialize};

/// Which `SimilaritySearchStrategy` a `MemoryStore` should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorStrategyMode {
    Auto,
    Vector,
    Text,
}

impl Default for VectorStrategyMode {
    fn default() -> Self {
        VectorStrategyMode::Auto
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub threshold: f64,
    pub max_results: usize,
    pub vector_strategy: VectorStrategyMode,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            max_results: 10_000,
            vector_strategy: VectorStrategyMode::Auto,
        }
    }
}
