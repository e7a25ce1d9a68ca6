/// Top-level error type for the Cortex memory and belief engine.
///
/// Every store, engine, and pipeline method returns `CortexResult<T>`.
/// Variants are deliberately flat rather than nested per-subsystem: callers
/// at the API boundary need one `match` to derive a machine-readable code.
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("temporal violation: {0}")]
    TemporalViolation(String),

    #[error("self reference: {belief_id} cannot relate to itself")]
    SelfReference { belief_id: String },

    #[error("traversal limit exceeded: visited {visited} nodes, limit {limit}")]
    TraversalLimitExceeded { visited: usize, limit: usize },

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("extraction provider unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias used by every fallible operation in this workspace.
pub type CortexResult<T> = Result<T, CortexError>;
