use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use cortex_core::config::{BeliefConfig, ResolutionStrategy};
use cortex_core::errors::CortexResult;
use cortex_core::models::{Belief, BeliefConflict, ConflictSeverity, MemoryRecord, RelationshipType};
use cortex_core::traits::{BeliefStore, ExtractionProvider, RelationshipStore};
use tracing::{debug, info};

use crate::agent_lock::AgentLockRegistry;

/// Outcome of `BeliefEngine::analyze_new_memory`/`analyze_batch` for one
/// memory: which beliefs were touched and which conflicts were recorded.
#[derive(Debug, Clone, Default)]
pub struct BeliefUpdateResult {
    pub reinforced_beliefs: Vec<Belief>,
    pub new_beliefs: Vec<Belief>,
    pub weakened_beliefs: Vec<Belief>,
    pub conflicts: Vec<BeliefConflict>,
}

impl BeliefUpdateResult {
    fn merge(&mut self, other: BeliefUpdateResult) {
        self.reinforced_beliefs.extend(other.reinforced_beliefs);
        self.new_beliefs.extend(other.new_beliefs);
        self.weakened_beliefs.extend(other.weakened_beliefs);
        self.conflicts.extend(other.conflicts);
    }

    pub fn touched_belief_ids(&self) -> Vec<String> {
        self.reinforced_beliefs
            .iter()
            .chain(self.new_beliefs.iter())
            .chain(self.weakened_beliefs.iter())
            .map(|b| b.id.clone())
            .collect()
    }
}

/// Orchestrates C1 (extraction) against C4/C5 (belief + relationship
/// storage): extraction, reinforcement, conflict detection and resolution.
pub struct BeliefEngine {
    belief_store: Arc<dyn BeliefStore>,
    relationship_store: Arc<dyn RelationshipStore>,
    extraction: Arc<dyn ExtractionProvider>,
    config: BeliefConfig,
    locks: AgentLockRegistry,
}

impl BeliefEngine {
    pub fn new(
        belief_store: Arc<dyn BeliefStore>,
        relationship_store: Arc<dyn RelationshipStore>,
        extraction: Arc<dyn ExtractionProvider>,
        config: BeliefConfig,
    ) -> Self {
        Self {
            belief_store,
            relationship_store,
            extraction,
            config,
            locks: AgentLockRegistry::new(),
        }
    }

    pub fn analyze_new_memory(&self, memory: &MemoryRecord) -> CortexResult<BeliefUpdateResult> {
        self.locks
            .with_lock(&memory.agent_id, || self.analyze_locked(memory))
    }

    /// Processes memories grouped by agent, each agent's memories in
    /// `created_at asc, id asc` order, so repeated runs over the same input
    /// produce the same sequence of reinforcements and conflicts.
    pub fn analyze_batch(&self, memories: &[MemoryRecord]) -> CortexResult<Vec<BeliefUpdateResult>> {
        let mut by_agent: HashMap<&str, Vec<&MemoryRecord>> = HashMap::new();
        for m in memories {
            by_agent.entry(m.agent_id.as_str()).or_default().push(m);
        }

        let mut agent_ids: Vec<&str> = by_agent.keys().copied().collect();
        agent_ids.sort_unstable();

        let mut results = Vec::with_capacity(memories.len());
        for agent_id in agent_ids {
            let mut group = by_agent.remove(agent_id).unwrap_or_default();
            group.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
            for m in group {
                results.push(self.analyze_new_memory(m)?);
            }
        }
        Ok(results)
    }

    fn analyze_locked(&self, memory: &MemoryRecord) -> CortexResult<BeliefUpdateResult> {
        let extracted = self
            .extraction
            .extract(&memory.content, &memory.agent_id, &memory.category)?;

        let mut result = BeliefUpdateResult::default();
        let now = Utc::now();

        for e in extracted {
            let candidates = self
                .belief_store
                .find_by_agent_and_category(&memory.agent_id, &e.category.primary)?
                .into_iter()
                .filter(|b| b.active)
                .map(|b| {
                    let similarity = self.extraction.similarity(&e.statement, &b.statement)?;
                    Ok::<_, cortex_core::CortexError>((b, similarity))
                })
                .collect::<CortexResult<Vec<_>>>()?
                .into_iter()
                .filter(|(_, similarity)| *similarity >= self.config.reinforce_threshold)
                .collect::<Vec<_>>();

            let mut conflicting_with: Vec<Belief> = Vec::new();
            for (candidate, _) in &candidates {
                if self.extraction.are_conflicting(&e.statement, &candidate.statement)? {
                    conflicting_with.push(candidate.clone());
                }
            }

            if !conflicting_with.is_empty() {
                let one = self.resolve_conflict(memory, &e, conflicting_with, now)?;
                result.merge(one);
                continue;
            }

            if let Some((mut belief, _)) = candidates
                .into_iter()
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            {
                belief.reinforce(e.confidence, self.config.reinforce_alpha, now);
                belief.evidence_memory_ids.insert(memory.id.clone());
                for tag in &e.tags {
                    belief.tags.insert(tag.clone());
                }
                let stored = self.belief_store.put(belief)?;
                debug!(belief_id = %stored.id, confidence = stored.confidence, "reinforced belief");
                result.reinforced_beliefs.push(stored);
            } else {
                let mut belief = Belief::new(
                    Uuid::new_v4().to_string(),
                    memory.agent_id.clone(),
                    e.statement.clone(),
                    e.confidence,
                    Some(e.category.clone()),
                    now,
                    memory.id.clone(),
                );
                for tag in &e.tags {
                    belief.tags.insert(tag.clone());
                }
                let stored = self.belief_store.put(belief)?;
                info!(belief_id = %stored.id, "created new belief");
                result.new_beliefs.push(stored);
            }
        }

        Ok(result)
    }

    /// Record a conflict between the newly extracted statement `e` and one
    /// or more existing `candidates`, then apply the category's configured
    /// `ResolutionStrategy`.
    fn resolve_conflict(
        &self,
        memory: &MemoryRecord,
        e: &cortex_core::traits::ExtractedBelief,
        candidates: Vec<Belief>,
        now: chrono::DateTime<Utc>,
    ) -> CortexResult<BeliefUpdateResult> {
        let mut result = BeliefUpdateResult::default();
        let strategy = self.config.resolution_for(&e.category.primary);

        let max_delta = candidates
            .iter()
            .map(|c| (e.confidence - c.confidence).abs())
            .fold(0.0_f64, f64::max);
        let severity = ConflictSeverity::from_confidence_delta(max_delta);

        let new_belief = Belief::new(
            Uuid::new_v4().to_string(),
            memory.agent_id.clone(),
            e.statement.clone(),
            e.confidence,
            Some(e.category.clone()),
            now,
            memory.id.clone(),
        );

        let mut conflict = BeliefConflict {
            id: Uuid::new_v4().to_string(),
            agent_id: memory.agent_id.clone(),
            conflicting_belief_ids: candidates.iter().map(|c| c.id.clone()).collect(),
            new_evidence_memory_id: Some(memory.id.clone()),
            description: format!(
                "new statement \"{}\" contradicts {} existing belief(s)",
                e.statement,
                candidates.len()
            ),
            conflict_type: "contradiction".to_string(),
            severity,
            detected_at: now,
            resolved: false,
            resolved_at: None,
            resolution_strategy: None,
            resolution_notes: None,
            auto_resolvable: true,
        };

        match strategy {
            ResolutionStrategy::NewerWins => {
                let new_belief = self.belief_store.put(new_belief)?;
                for old in &candidates {
                    self.relationship_store.deprecate_belief_with(
                        &old.id,
                        &new_belief.id,
                        "conflict: newer_wins",
                        &memory.agent_id,
                    )?;
                }
                conflict.mark_resolved(now, strategy, "newer statement superseded prior belief(s)");
                result.new_beliefs.push(new_belief);
            }
            ResolutionStrategy::HigherConfidence => {
                let mut loser_wins_new = false;
                for old in candidates {
                    let mut weakened = old.clone();
                    weakened.weaken(e.confidence, self.config.weaken_beta, now);
                    if e.confidence >= weakened.confidence {
                        weakened.deactivate(now);
                        let stored = self.belief_store.put(weakened)?;
                        self.relationship_store.create_relationship(
                            &new_belief.id,
                            &stored.id,
                            RelationshipType::Contradicts,
                            1.0,
                            &memory.agent_id,
                            HashMap::new(),
                        )?;
                        result.weakened_beliefs.push(stored);
                    } else {
                        let stored = self.belief_store.put(weakened)?;
                        result.weakened_beliefs.push(stored);
                        loser_wins_new = true;
                    }
                }
                if !loser_wins_new {
                    let new_belief = self.belief_store.put(new_belief)?;
                    result.new_beliefs.push(new_belief);
                }
                conflict.mark_resolved(now, strategy, "resolved by comparing post-update confidence");
            }
            ResolutionStrategy::KeepBothFlag => {
                let new_belief = self.belief_store.put(new_belief)?;
                for old in &candidates {
                    self.relationship_store.create_relationship(
                        &new_belief.id,
                        &old.id,
                        RelationshipType::Contradicts,
                        1.0,
                        &memory.agent_id,
                        HashMap::new(),
                    )?;
                }
                conflict.auto_resolvable = false;
                result.new_beliefs.push(new_belief);
            }
        }

        let conflict = self.belief_store.put_conflict(conflict)?;
        result.conflicts.push(conflict);
        Ok(result)
    }

    /// Potential conflicts among an agent's active beliefs: pairs already
    /// linked by a `Contradicts` edge, plus pairs in the same category whose
    /// statements score at or above `reinforce_threshold` on
    /// `ExtractionProvider::similarity` and that `are_conflicting` flags.
    /// The latter half is not persisted; callers decide what to do with it.
    pub fn find_potential_conflicts(&self, agent_id: &str) -> CortexResult<Vec<(String, String)>> {
        let mut pairs: Vec<(String, String)> = self.relationship_store.find_potential_conflicts(agent_id)?;
        let mut seen: std::collections::HashSet<(String, String)> = pairs
            .iter()
            .map(|(a, b)| if a <= b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) })
            .collect();

        let categories = self.belief_store.count_by_category(agent_id)?;
        for category in categories.keys() {
            let active: Vec<Belief> = self
                .belief_store
                .find_by_agent_and_category(agent_id, category)?
                .into_iter()
                .filter(|b| b.active)
                .collect();

            for i in 0..active.len() {
                for j in (i + 1)..active.len() {
                    let (a, b) = (&active[i], &active[j]);
                    let key = if a.id <= b.id {
                        (a.id.clone(), b.id.clone())
                    } else {
                        (b.id.clone(), a.id.clone())
                    };
                    if seen.contains(&key) {
                        continue;
                    }
                    let similarity = self.extraction.similarity(&a.statement, &b.statement)?;
                    if similarity < self.config.reinforce_threshold {
                        continue;
                    }
                    if self.extraction.are_conflicting(&a.statement, &b.statement)? {
                        seen.insert(key.clone());
                        pairs.push(key);
                    }
                }
            }
        }

        Ok(pairs)
    }
}
