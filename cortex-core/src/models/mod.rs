mod belief;
mod category;
mod conflict;
mod memory;
mod relationship;

pub use belief::Belief;
pub use category::CategoryLabel;
pub use conflict::{BeliefConflict, ConflictSeverity};
pub use memory::{Metadata, MemoryRecord};
pub use relationship::{BeliefRelationship, RelationshipType};
