use std::collections::HashSet;

use cortex_core::errors::CortexResult;
use cortex_core::models::CategoryLabel;
use cortex_core::traits::{ExtractedBelief, ExtractionProvider};

const STOPWORDS: &[&str] = &["the", "a", "an", "is", "my", "to", "of", "in", "and", "i"];

fn tokenize(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// A deterministic, keyword-driven stand-in for a model-backed
/// `ExtractionProvider`: splits content into clauses for extraction, and
/// uses token-overlap (Jaccard) for similarity/conflict detection. No
/// randomness — the same input always yields the same output, which is all
/// this workspace's own tests need.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicExtractionProvider;

impl DeterministicExtractionProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionProvider for DeterministicExtractionProvider {
    fn classify(&self, content: &str) -> CortexResult<CategoryLabel> {
        let lower = content.to_lowercase();
        let primary = if lower.contains("food") || lower.contains("cuisine") || lower.contains("eat") {
            "Preference"
        } else if lower.contains("color") || lower.contains("colour") {
            "Preference"
        } else if lower.contains("live") || lower.contains("city") || lower.contains("address") {
            "Fact"
        } else {
            "General"
        };
        Ok(CategoryLabel {
            primary: primary.to_string(),
            secondary: None,
            tags: HashSet::new(),
            confidence: 0.85,
        })
    }

    fn extract(
        &self,
        content: &str,
        _agent_id: &str,
        category: &CategoryLabel,
    ) -> CortexResult<Vec<ExtractedBelief>> {
        let beliefs = content
            .split(|c| c == '.' || c == ';')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(|clause| {
                let lower = clause.to_lowercase();
                let polarity = !(lower.contains("no longer") || lower.contains("don't") || lower.contains("not "));
                ExtractedBelief {
                    statement: clause.to_string(),
                    category: category.clone(),
                    polarity,
                    confidence: 0.9,
                    tags: Vec::new(),
                }
            })
            .collect();
        Ok(beliefs)
    }

    fn similarity(&self, a: &str, b: &str) -> CortexResult<f64> {
        Ok(jaccard(&tokenize(a), &tokenize(b)))
    }

    fn are_conflicting(&self, a: &str, b: &str) -> CortexResult<bool> {
        if a.trim().eq_ignore_ascii_case(b.trim()) {
            return Ok(false);
        }
        let score = jaccard(&tokenize(a), &tokenize(b));
        Ok(score >= 0.5 && score < 1.0)
    }
}
