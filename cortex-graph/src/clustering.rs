use std::collections::{HashMap, HashSet};

use cortex_core::models::BeliefRelationship;

/// Minimal union-find over belief ids, used to group beliefs connected by
/// edges at or above a strength threshold into undirected clusters.
struct DisjointSet {
    parent: HashMap<String, String>,
}

impl DisjointSet {
    fn new() -> Self {
        Self {
            parent: HashMap::new(),
        }
    }

    fn find(&mut self, id: &str) -> String {
        let parent = self
            .parent
            .entry(id.to_string())
            .or_insert_with(|| id.to_string())
            .clone();
        if parent == id {
            id.to_string()
        } else {
            let root = self.find(&parent);
            self.parent.insert(id.to_string(), root.clone());
            root
        }
    }

    fn union(&mut self, a: &str, b: &str) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }
}

/// Connected-component clustering: two beliefs land in the same cluster if
/// they are joined, directly or transitively, by edges whose strength is
/// `>= strength_threshold`. Direction is ignored — clustering asks "are
/// these beliefs mutually reinforcing," not "which implies which."
///
/// Clusters of size 1 (beliefs with no qualifying edge) are omitted; callers
/// that need isolated beliefs already have the full belief list.
pub fn find_belief_clusters(
    edges: &[BeliefRelationship],
    strength_threshold: f64,
) -> HashMap<usize, HashSet<String>> {
    let mut dsu = DisjointSet::new();
    let mut members: HashSet<String> = HashSet::new();

    for edge in edges {
        if edge.strength < strength_threshold {
            continue;
        }
        dsu.find(&edge.source_belief_id);
        dsu.find(&edge.target_belief_id);
        dsu.union(&edge.source_belief_id, &edge.target_belief_id);
        members.insert(edge.source_belief_id.clone());
        members.insert(edge.target_belief_id.clone());
    }

    let mut by_root: HashMap<String, HashSet<String>> = HashMap::new();
    for id in &members {
        let root = dsu.find(id);
        by_root.entry(root).or_default().insert(id.clone());
    }

    let mut roots: Vec<String> = by_root.keys().cloned().collect();
    roots.sort();

    roots
        .into_iter()
        .enumerate()
        .map(|(cluster_index, root)| (cluster_index, by_root.remove(&root).unwrap()))
        .collect()
}
