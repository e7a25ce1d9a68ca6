//! Orchestration layer: ingestion pipeline, belief engine, relevance/
//! forgetting engine, and knowledge-graph snapshot assembly. Depends on
//! `cortex-storage` and `cortex-graph` for persistence and graph algorithms;
//! exposes no SQL or graph details of its own.

mod agent_lock;
mod belief_engine;
mod forgetting;
mod graph_view;
mod ingestion;

pub use agent_lock::AgentLockRegistry;
pub use belief_engine::{BeliefEngine, BeliefUpdateResult};
pub use forgetting::{ForgettingReport, RelevanceForgettingEngine};
pub use graph_view::{GraphViewAssembler, KnowledgeGraphView};
pub use ingestion::{DryRunResult, IngestionInput, IngestionPipeline, IngestionResult, IngestionStatus};
