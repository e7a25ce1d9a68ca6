use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use cortex_core::config::ForgettingConfig;
use cortex_core::errors::CortexResult;
use cortex_core::models::MemoryRecord;
use cortex_core::traits::{BeliefStore, MemoryStore};
use tracing::info;

use cortex_core::traits::ForgettingStrategy;

/// Batches smaller than this are scored sequentially; `rayon` overhead isn't
/// worth it below this size.
const PARALLEL_BATCH_THRESHOLD: usize = 32;

const LIST_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub struct ForgettingReport {
    pub strategy: &'static str,
    pub candidates: Vec<String>,
    pub protected: Vec<String>,
    pub removed: Vec<String>,
    pub dry_run: bool,
}

/// Scores memory relevance and runs forgetting strategies against C3/C4
/// (C8).
pub struct RelevanceForgettingEngine {
    memory_store: Arc<dyn MemoryStore>,
    belief_store: Arc<dyn BeliefStore>,
    config: ForgettingConfig,
}

impl RelevanceForgettingEngine {
    pub fn new(memory_store: Arc<dyn MemoryStore>, belief_store: Arc<dyn BeliefStore>, config: ForgettingConfig) -> Self {
        Self {
            memory_store,
            belief_store,
            config,
        }
    }

    /// Weighted sum of recency, access frequency, importance, and belief
    /// support, per the configured weights (must sum to 1).
    pub fn evaluate(&self, memory: &MemoryRecord, now: DateTime<Utc>) -> CortexResult<f64> {
        let age_days = (now - memory.created_at).num_seconds() as f64 / 86_400.0;
        let recency = (-age_days.max(0.0) / self.config.recency_tau_days).exp();
        let access_frequency = (memory.metadata.access_count as f64 / self.config.access_frequency_k).min(1.0);
        let importance = memory.metadata.importance;
        let belief_support = self.belief_support(memory)?;

        let w = &self.config.weights;
        Ok((w.recency * recency
            + w.access_frequency * access_frequency
            + w.importance * importance
            + w.belief_support * belief_support)
            .clamp(0.0, 1.0))
    }

    /// Count of this agent's beliefs in the memory's category that cite it
    /// as evidence, scaled by `belief_support_s`.
    fn belief_support(&self, memory: &MemoryRecord) -> CortexResult<f64> {
        let citing = self
            .belief_store
            .find_by_agent_and_category(&memory.agent_id, &memory.category.primary)?
            .into_iter()
            .filter(|b| b.evidence_memory_ids.contains(&memory.id))
            .count();
        Ok((citing as f64 / self.config.belief_support_s).min(1.0))
    }

    pub fn evaluate_batch(
        &self,
        memories: &[MemoryRecord],
        now: DateTime<Utc>,
    ) -> CortexResult<HashMap<String, f64>> {
        if memories.len() < PARALLEL_BATCH_THRESHOLD {
            return memories
                .iter()
                .map(|m| Ok((m.id.clone(), self.evaluate(m, now)?)))
                .collect();
        }

        memories
            .par_iter()
            .map(|m| self.evaluate(m, now).map(|score| (m.id.clone(), score)))
            .collect()
    }

    fn list_all(&self, agent_id: &str) -> CortexResult<Vec<MemoryRecord>> {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.memory_store.list_by_agent(agent_id, LIST_PAGE_SIZE, cursor.as_deref())?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(out)
    }

    pub fn perform_forgetting(&self, strategy: ForgettingStrategy, agent_id: &str) -> CortexResult<ForgettingReport> {
        let now = Utc::now();
        let memories = self.list_all(agent_id)?;

        let candidate_ids: Vec<String> = match &strategy {
            ForgettingStrategy::Age { max_age } => memories
                .iter()
                .filter(|m| now - m.created_at > *max_age)
                .map(|m| m.id.clone())
                .collect(),
            ForgettingStrategy::LeastUsed { retain_count } => {
                let mut scored = memories
                    .iter()
                    .map(|m| Ok((m.id.clone(), self.evaluate(m, now)?)))
                    .collect::<CortexResult<Vec<_>>>()?;
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                scored.into_iter().skip(*retain_count).map(|(id, _)| id).collect()
            }
            ForgettingStrategy::LowScore { threshold } => memories
                .iter()
                .map(|m| Ok::<_, cortex_core::CortexError>((m, self.evaluate(m, now)?)))
                .collect::<CortexResult<Vec<_>>>()?
                .into_iter()
                .filter(|(_, score)| *score < *threshold)
                .map(|(m, _)| m.id.clone())
                .collect(),
            ForgettingStrategy::Explicit { ids } => ids.clone(),
        };

        let by_id: HashMap<&str, &MemoryRecord> = memories.iter().map(|m| (m.id.as_str(), m)).collect();
        let mut protected = Vec::new();
        let mut removable = Vec::new();
        for id in &candidate_ids {
            let Some(memory) = by_id.get(id.as_str()) else {
                continue;
            };
            if self.is_protected(memory) {
                protected.push(id.clone());
            } else {
                removable.push(id.clone());
            }
        }

        let removed = if self.config.dry_run {
            Vec::new()
        } else {
            for id in &removable {
                self.memory_store.delete(id)?;
            }
            removable.clone()
        };

        info!(
            strategy = strategy.name(),
            candidates = candidate_ids.len(),
            protected = protected.len(),
            removed = removed.len(),
            dry_run = self.config.dry_run,
            "forgetting pass complete"
        );

        Ok(ForgettingReport {
            strategy: strategy.name(),
            candidates: candidate_ids,
            protected,
            removed,
            dry_run: self.config.dry_run,
        })
    }

    /// A memory is protected if it matches any configured protection rule.
    /// Rules are either `field:value` equality expressions over `tag`,
    /// `category`, `source`, `id`, or a numeric comparison on `importance`
    /// (`importance>=0.9`, `importance<0.2`, and so on).
    fn is_protected(&self, memory: &MemoryRecord) -> bool {
        self.config.protection_rules.values().any(|expr| rule_matches(expr, memory))
    }

    pub fn archive(&self, ids: &[String], reason: &str) -> CortexResult<usize> {
        self.memory_store.archive(ids, reason)
    }

    pub fn restore(&self, ids: &[String]) -> CortexResult<usize> {
        self.memory_store.restore(ids)
    }
}

/// Comparison operators for numeric rules, longest first so `>=`/`<=` are
/// tried before their single-character prefixes.
const NUMERIC_OPERATORS: &[&str] = &[">=", "<=", ">", "<"];

fn rule_matches(expr: &str, memory: &MemoryRecord) -> bool {
    if let Some((field, op, threshold)) = parse_numeric_rule(expr) {
        return numeric_field(field.trim(), memory)
            .map(|actual| apply_operator(actual, op, threshold))
            .unwrap_or(false);
    }

    let Some((field, value)) = expr.split_once(':') else {
        return false;
    };
    let value = value.trim();
    match field.trim() {
        "tag" => memory.category.tags.contains(value),
        "category" => memory.category.primary == value,
        "source" => memory.metadata.source.as_deref() == Some(value),
        "id" => memory.id == value,
        _ => false,
    }
}

fn parse_numeric_rule(expr: &str) -> Option<(&str, &str, f64)> {
    for op in NUMERIC_OPERATORS {
        if let Some((field, rest)) = expr.split_once(op) {
            if let Ok(threshold) = rest.trim().parse::<f64>() {
                return Some((field, op, threshold));
            }
        }
    }
    None
}

fn numeric_field(field: &str, memory: &MemoryRecord) -> Option<f64> {
    match field {
        "importance" => Some(memory.metadata.importance),
        _ => None,
    }
}

fn apply_operator(actual: f64, op: &str, threshold: f64) -> bool {
    match op {
        ">=" => actual >= threshold,
        "<=" => actual <= threshold,
        ">" => actual > threshold,
        "<" => actual < threshold,
        _ => false,
    }
}
