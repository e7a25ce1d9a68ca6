//! # cortex-graph
//!
//! In-memory graph algorithms over the belief relationship graph:
//! breadth-first traversal, shortest path, connected-component clustering,
//! and deprecation-chain walking.
//!
//! This crate never talks to storage. Callers (`cortex-storage`) fetch the
//! live subgraph for one agent — active edges whose temporal bounds cover
//! "now" — and hand it to [`LiveSubgraph::build`]; the resulting structure
//! lives only for the duration of a single traversal call. No long-lived
//! in-memory object graph is ever kept around.

mod clustering;
mod deprecation;
mod subgraph;
mod traversal;

pub use clustering::find_belief_clusters;
pub use deprecation::find_deprecation_chain;
pub use subgraph::{EdgeWeight, LiveSubgraph};
pub use traversal::{find_related_belief_ids, find_shortest_path};
