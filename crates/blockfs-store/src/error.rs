//! Error types for block store backends.

use thiserror::Error;

/// Errors from block store operations.
///
/// The filesystem layer does not interpret or retry these; they propagate
/// to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error from a disk-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be represented by this backend.
    #[error("Invalid store key: {key}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}
