use crate::types::DbId;

/// Why an external generation job did not produce a result.
///
/// All three reasons take the same recovery path: the target shot returns to
/// `error` with the reason recorded, keyframe and prompt untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayFailure {
    /// The caller cancelled the in-flight job.
    #[error("Generation cancelled")]
    Cancelled,

    /// No resolution within the configured liveness window.
    #[error("Generation timed out")]
    Timeout,

    /// The synthesis backend reported a failure.
    #[error("Generation backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation is not legal in the shot's current lifecycle state,
    /// e.g. generating without a keyframe or while a job is in flight.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A reorder request that is not a full permutation of the scene's shots.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayFailure),

    /// An invariant breach surfaced at read time (e.g. an order_index gap).
    /// Treated as a bug: logged and surfaced, never silently repaired.
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
