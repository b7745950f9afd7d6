//! Unified error taxonomy for the order core
//!
//! Every failure is scoped to one user action; nothing here is fatal to
//! the process. The caller decides whether to prompt a retry.

use crate::models::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed input, recovered locally. No state change.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The viewer is neither party of the order, or holds the wrong role
    /// for the attempted action.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No edge in the transition table matches `(from, to)`. Usually a
    /// race with the other party; refetch the order and retry.
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend/transport failure. Surfaced with a retry affordance, never
    /// retried automatically.
    #[error("Store error: {0}")]
    Store(String),

    /// Proof image upload failed. The order is untouched; retry the whole
    /// attach from scratch.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Proof blob was stored but the status commit failed. Retry the
    /// commit with `proof_url` instead of re-uploading.
    #[error("Proof uploaded to {proof_url} but commit failed: {source}")]
    UploadOrphan {
        proof_url: String,
        #[source]
        source: Box<CoreError>,
    },
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True when the caller should refetch state and retry the same action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTransition { .. }
                | CoreError::Store(_)
                | CoreError::Upload(_)
                | CoreError::UploadOrphan { .. }
        )
    }
}
