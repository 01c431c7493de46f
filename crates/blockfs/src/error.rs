//! Error types for filesystem operations.

use blockfs_store::StoreError;
use thiserror::Error;

/// Errors that can occur during filesystem operations.
///
/// The first five variants are the POSIX-flavored taxonomy the path
/// operations report; each carries the offending path so callers can
/// format a message. Store and codec failures pass through
/// uninterpreted.
#[derive(Debug, Error)]
pub enum VfsError {
    /// No such file or directory (`ENOENT`): a path segment does not exist.
    #[error("No such file or directory: {path}")]
    NotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// Not a directory (`ENOTDIR`): a directory was required.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: String,
    },

    /// Is a directory (`EISDIR`): a file operation hit a directory.
    #[error("Is a directory: {path}")]
    IsADirectory {
        /// The offending path.
        path: String,
    },

    /// Target name already exists (`EEXIST`).
    #[error("File exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: String,
    },

    /// Directory has entries and cannot be removed.
    #[error("Directory not empty: {path}")]
    NotEmpty {
        /// The non-empty directory.
        path: String,
    },

    /// Entry name is not usable (empty, contains `/`, or reserved).
    #[error("Invalid entry name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A block referenced by an inode is missing from the store.
    #[error("Content block missing from store: {block}")]
    MissingBlock {
        /// The missing block identifier.
        block: String,
    },

    /// Block store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A persisted record failed to decode.
    #[error("Record codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
