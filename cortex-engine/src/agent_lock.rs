use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;

/// Per-agent logical lock, created lazily, one `Arc<Mutex<()>>` per
/// `agent_id`. Held for the duration of a single `BeliefEngine::analyze_*`
/// call so belief find/reinforce, conflict insertion, and relationship
/// creation/deactivation for one agent never interleave across threads.
/// Cross-agent operations never contend with each other.
#[derive(Debug, Default)]
pub struct AgentLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AgentLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, agent_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(agent_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the lock for `agent_id`. Poisoning is treated as
    /// an internal bug elsewhere in the process, not a reason to wedge every
    /// future ingestion for this agent, so a poisoned lock is recovered via
    /// `into_inner`.
    pub fn with_lock<T>(&self, agent_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(agent_id);
        let _guard: MutexGuard<'_, ()> = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f()
    }
}
