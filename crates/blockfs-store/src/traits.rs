//! The store trait and its namespaces.

use async_trait::async_trait;

use crate::error::StoreError;

/// Logical namespaces within a block store.
///
/// Inode records and content blocks live in separate key spaces so a key
/// like `"2"` can name both an inode and a block without collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Inode records keyed by inode number, plus the superblock record.
    Inodes,
    /// Content blocks keyed by block identifier.
    Blocks,
}

impl Namespace {
    /// All namespaces, in a fixed order.
    pub const ALL: [Namespace; 2] = [Namespace::Inodes, Namespace::Blocks];

    /// Stable string tag used by backends to segregate keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Inodes => "inodes",
            Namespace::Blocks => "blocks",
        }
    }
}

/// Asynchronous key-value store holding opaque byte records.
///
/// Implement this trait to back the filesystem with different storage
/// (memory, local disk, a browser object store behind a bridge, etc.).
/// All operations are asynchronous and may fail with a backend-level
/// [`StoreError`].
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Fetch a record.
    ///
    /// # Arguments
    /// * `ns` - Namespace to read from
    /// * `key` - Record key
    ///
    /// # Returns
    /// The record bytes, or None if the key is absent.
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a record, replacing any previous value.
    ///
    /// # Arguments
    /// * `ns` - Namespace to write to
    /// * `key` - Record key
    /// * `data` - Record bytes
    async fn put(&self, ns: Namespace, key: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Delete a record. Deleting an absent key is not an error.
    ///
    /// # Arguments
    /// * `ns` - Namespace to delete from
    /// * `key` - Record key
    async fn delete(&self, ns: Namespace, key: &str) -> Result<(), StoreError>;

    /// Remove every record in a namespace.
    ///
    /// # Arguments
    /// * `ns` - Namespace to clear
    async fn clear(&self, ns: Namespace) -> Result<(), StoreError>;
}
