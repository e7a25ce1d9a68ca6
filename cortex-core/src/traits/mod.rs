mod belief_store;
mod extraction;
mod forgetting_strategy;
mod memory_store;
mod relationship_store;
mod similarity_strategy;

pub use belief_store::BeliefStore;
pub use extraction::{ExtractedBelief, ExtractionProvider};
pub use forgetting_strategy::ForgettingStrategy;
pub use memory_store::{MemoryPage, MemoryStore};
pub use relationship_store::{GraphStatistics, RelationshipStore};
pub use similarity_strategy::{cosine_similarity, SimilarityQuery, SimilarityResult, SimilaritySearchStrategy};
