use thiserror::Error;

/// Malformed caller input. The only error that crosses the core boundary
/// in normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("session id is required")]
    MissingSessionId,

    #[error("message content must not be empty")]
    EmptyContent,

    #[error("message content is {actual} characters, limit is {max}")]
    ContentTooLong { max: usize, actual: usize },
}

/// Failures of the durable backend. Absorbed by the message store, which
/// falls back to the ephemeral store instead of surfacing them.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("durable backend not configured")]
    NotConfigured,

    #[error("durable backend timed out after {0}ms")]
    Timeout(u64),

    #[error("durable backend unavailable: {0}")]
    Unavailable(String),

    #[error("durable backend rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed backend record: {0}")]
    Decode(String),
}

/// Failures of the generation collaborator. Absorbed by the turn
/// orchestrator, which substitutes the default reply.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation provider error: {0}")]
    Provider(String),

    #[error("generation timed out after {0}ms")]
    Timeout(u64),

    #[error("generation returned an empty reply")]
    EmptyReply,

    #[error("generation not configured: {0}")]
    NotConfigured(String),
}

/// Errors surfaced by the message store and the turn orchestrator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The ephemeral store could not satisfy a request. Not expected under
    /// correct locking.
    #[error("ephemeral store failure: {0}")]
    Structural(String),
}
