//! `SimilaritySearchStrategy` implementations: vector cosine similarity,
//! text keyword matching, and an auto-detecting dispatcher between them.

mod auto_strategy;
mod text_strategy;
mod vector_strategy;

pub use auto_strategy::AutoStrategy;
pub use text_strategy::TextStrategy;
pub use vector_strategy::VectorStrategy;
