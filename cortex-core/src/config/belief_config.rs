//! Belief engine subsystem configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How a detected conflict between two candidate beliefs is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    NewerWins,
    HigherConfidence,
    KeepBothFlag,
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        ResolutionStrategy::NewerWins
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefConfig {
    /// Minimum `ExtractionProvider::similarity` score for a stored belief to
    /// be considered a reinforcement/conflict candidate for new evidence.
    pub reinforce_threshold: f64,
    /// `alpha` in the reinforcement rule `c' = min(1, c + (1-c)*alpha*e)`.
    pub reinforce_alpha: f64,
    /// `beta` in the weakening rule `c' = max(0, c - beta*e)`.
    pub weaken_beta: f64,
    /// Per-category resolution strategy override. Categories not present
    /// here use `default_resolution`.
    pub resolution: HashMap<String, ResolutionStrategy>,
    /// Resolution strategy used when a category has no entry in `resolution`.
    pub default_resolution: ResolutionStrategy,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            reinforce_threshold: 0.75,
            reinforce_alpha: 0.3,
            weaken_beta: 0.2,
            resolution: HashMap::new(),
            default_resolution: ResolutionStrategy::NewerWins,
        }
    }
}

impl BeliefConfig {
    /// Resolution strategy to use for a given category's primary label.
    pub fn resolution_for(&self, category_primary: &str) -> ResolutionStrategy {
        self.resolution
            .get(category_primary)
            .copied()
            .unwrap_or(self.default_resolution)
    }
}
