//! Error types for stamp card operations

use crate::storage::StorageError;
use thiserror::Error;

/// Stamp card errors
///
/// Policy rejections are not errors; see [`crate::StampOutcome`].
#[derive(Debug, Error)]
pub enum StampError {
    /// The backing store failed to read or write
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for stamp card operations
pub type StampResult<T> = Result<T, StampError>;
