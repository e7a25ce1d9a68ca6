//! Relevance/forgetting subsystem configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Weights for the four factors `RelevanceForgettingEngine::evaluate` sums.
/// Must sum to 1.0; callers that load configuration from disk should call
/// [`ForgettingWeights::is_normalized`] and reject/renormalize otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgettingWeights {
    pub recency: f64,
    pub access_frequency: f64,
    pub importance: f64,
    pub belief_support: f64,
}

impl Default for ForgettingWeights {
    fn default() -> Self {
        Self {
            recency: 0.4,
            access_frequency: 0.2,
            importance: 0.2,
            belief_support: 0.2,
        }
    }
}

impl ForgettingWeights {
    pub fn is_normalized(&self) -> bool {
        let sum = self.recency + self.access_frequency + self.importance + self.belief_support;
        (sum - 1.0).abs() < 1e-6
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgettingConfig {
    pub weights: ForgettingWeights,
    /// Recency half-life-ish time constant tau, in days, for `exp(-dt/tau)`.
    pub recency_tau_days: f64,
    /// `K` in `min(1, access_count/K)`.
    pub access_frequency_k: f64,
    /// `S` in `min(1, (#beliefs citing m)/S)`.
    pub belief_support_s: f64,
    /// Named protection-rule expressions evaluated per memory; a memory
    /// matching any rule is retained regardless of strategy.
    pub protection_rules: HashMap<String, String>,
    pub dry_run: bool,
}

impl Default for ForgettingConfig {
    fn default() -> Self {
        Self {
            weights: ForgettingWeights::default(),
            recency_tau_days: 30.0,
            access_frequency_k: 20.0,
            belief_support_s: 3.0,
            protection_rules: HashMap::new(),
            dry_run: false,
        }
    }
}
