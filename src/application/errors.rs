use thiserror::Error;

use crate::core::ports::EventStoreError;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Malformed or missing discriminators, detected before any store call.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The target has no representable or removable state.
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// A domain invariant blocks the transition independent of history.
    #[error("precondition failed: {0}")]
    PreconditionFailed(&'static str),

    /// Store failures propagate verbatim: concurrency conflicts and backend
    /// unavailability alike. No layer swallows or retries them.
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

impl CommandError {
    /// True when the store rejected the push because the declared precondition
    /// no longer held at commit time. Resolving it means reloading and
    /// recomputing the diff; a single push attempt is final.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(
            self,
            CommandError::Store(EventStoreError::ConcurrencyConflict { .. })
        )
    }
}
