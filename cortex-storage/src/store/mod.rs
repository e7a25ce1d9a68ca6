mod belief_store;
mod memory_store;
mod relationship_store;

pub use belief_store::SqliteBeliefStore;
pub use memory_store::SqliteMemoryStore;
pub use relationship_store::SqliteRelationshipStore;
