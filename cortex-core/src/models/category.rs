use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The output of classification: a primary label plus optional refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub primary: String,
    pub secondary: Option<String>,
    pub tags: HashSet<String>,
    pub confidence: f64,
}

impl CategoryLabel {
    pub fn unknown() -> Self {
        Self {
            primary: "Unknown".to_string(),
            secondary: None,
            tags: HashSet::new(),
            confidence: 0.2,
        }
    }
}
