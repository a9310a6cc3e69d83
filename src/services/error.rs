//! Error taxonomy for the availability engine.

use crate::db::{RepositoryError, RepositoryErrorKind};
use crate::models::time::TimeError;
use crate::models::window::OccupancyInterval;

/// Result type for service operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the availability engine's public operations.
///
/// Propagation failures during sibling fan-out are deliberately *not* here:
/// they are carried in [`super::PropagationReport`] alongside a committed
/// result, never in the error channel.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed or missing date/time data, detected before any storage
    /// access.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The candidate interval overlaps an active booking or block. The
    /// conflicting set is returned for diagnostics.
    #[error("conflict with {} occupancy interval(s)", .0.len())]
    Conflict(Vec<OccupancyInterval>),

    /// Listing, window, or block absent or not owned by the requester.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage failure mid-write; the transaction was rolled back and no
    /// partial rows were retained.
    #[error("transaction failed: {0}")]
    Transaction(String),
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err.kind {
            RepositoryErrorKind::NotFound => EngineError::NotFound(err.to_string()),
            RepositoryErrorKind::Validation => EngineError::Validation(err.to_string()),
            _ => EngineError::Transaction(err.to_string()),
        }
    }
}

impl From<TimeError> for EngineError {
    fn from(err: TimeError) -> Self {
        EngineError::Validation(err.to_string())
    }
}
