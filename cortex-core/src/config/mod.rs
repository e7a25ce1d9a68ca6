mod belief_config;
mod forgetting_config;
mod graph_config;
mod similarity_config;

use serde::{Deserialize, Serialize};

pub use belief_config::{BeliefConfig, ResolutionStrategy};
pub use forgetting_config::ForgettingConfig;
pub use graph_config::{DuplicateEdgePolicy, GraphConfig};
pub use similarity_config::{SimilarityConfig, VectorStrategyMode};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CortexConfig {
    pub similarity: SimilarityConfig,
    pub belief: BeliefConfig,
    pub forgetting: ForgettingConfig,
    pub graph: GraphConfig,
}

impl CortexConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
