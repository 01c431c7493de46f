//! Core inode record types.

use blockfs_store::{BlockStore, Namespace};
use serde::{Deserialize, Serialize};

use crate::error::VfsError;

/// Inode number.
pub type Ino = u64;

/// Identifier of a content block in the block namespace.
pub type BlockId = String;

/// Root directory inode number (always present on a formatted filesystem).
pub const ROOT_INODE: Ino = 1;

/// Default directory permissions (rwxr-xr-x).
pub const DEFAULT_DIR_MODE: u16 = 0o755;

/// Default file permissions (rw-r--r--).
pub const DEFAULT_FILE_MODE: u16 = 0o644;

/// Kind of filesystem entry. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InodeKind {
    /// Directory: blocks encode a name → inode-number table.
    Directory,
    /// Regular file: blocks encode raw content chunks.
    Regular,
}

/// The metadata record identifying one filesystem entry.
///
/// One inode exists per entry; a directory's entries reference child
/// inodes by number only, so an inode carries no parent pointer and its
/// parent is discovered only by re-walking from the root. The record
/// round-trips losslessly through the store's byte records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inode {
    /// Inode number.
    pub ino: Ino,
    /// Entry kind.
    pub kind: InodeKind,
    /// Permission bits. Stored, not enforced.
    pub mode: u16,
    /// Content size in bytes (0 for directories).
    pub size: u64,
    /// Ordered block identifiers holding this entry's content.
    pub blocks: Vec<BlockId>,
}

impl Inode {
    /// Create a new record with no content blocks.
    ///
    /// # Arguments
    /// * `ino` - Inode number
    /// * `kind` - Entry kind
    /// * `mode` - Permission bits
    pub fn new(ino: Ino, kind: InodeKind, mode: u16) -> Self {
        Self {
            ino,
            kind,
            mode,
            size: 0,
            blocks: Vec::new(),
        }
    }

    /// Whether this inode is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    /// Whether this inode is a regular file.
    pub fn is_regular(&self) -> bool {
        self.kind == InodeKind::Regular
    }

    /// Store key for an inode number.
    pub fn store_key(ino: Ino) -> String {
        ino.to_string()
    }

    /// Load an inode record by number.
    ///
    /// # Arguments
    /// * `store` - Block store to read from
    /// * `ino` - Inode number
    ///
    /// # Returns
    /// The record, or None if no such inode is stored.
    pub async fn load(store: &dyn BlockStore, ino: Ino) -> Result<Option<Inode>, VfsError> {
        match store.get(Namespace::Inodes, &Self::store_key(ino)).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Persist this record under its inode number.
    ///
    /// # Arguments
    /// * `store` - Block store to write to
    pub async fn save(&self, store: &dyn BlockStore) -> Result<(), VfsError> {
        let data: Vec<u8> = serde_json::to_vec(self)?;
        store
            .put(Namespace::Inodes, &Self::store_key(self.ino), &data)
            .await?;
        Ok(())
    }

    /// Delete the stored record for an inode number.
    ///
    /// # Arguments
    /// * `store` - Block store to delete from
    /// * `ino` - Inode number
    pub async fn remove(store: &dyn BlockStore, ino: Ino) -> Result<(), VfsError> {
        store.delete(Namespace::Inodes, &Self::store_key(ino)).await?;
        Ok(())
    }
}

/// Block identifier for the `seq`-th block owned by inode `ino`.
pub(crate) fn block_id(ino: Ino, seq: u64) -> BlockId {
    format!("{}.{}", ino, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfs_store::MemoryBlockStore;

    #[test]
    fn test_new_inode_has_no_blocks() {
        let inode: Inode = Inode::new(2, InodeKind::Regular, DEFAULT_FILE_MODE);

        assert_eq!(inode.ino, 2);
        assert!(inode.is_regular());
        assert!(!inode.is_directory());
        assert_eq!(inode.size, 0);
        assert!(inode.blocks.is_empty());
    }

    #[test]
    fn test_record_round_trip_is_lossless() {
        let mut inode: Inode = Inode::new(7, InodeKind::Regular, DEFAULT_FILE_MODE);
        inode.size = 9000;
        inode.blocks = vec![block_id(7, 0), block_id(7, 1), block_id(7, 2)];

        let data: Vec<u8> = serde_json::to_vec(&inode).unwrap();
        let decoded: Inode = serde_json::from_slice(&data).unwrap();

        assert_eq!(decoded, inode);
    }

    #[tokio::test]
    async fn test_save_load_remove() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let inode: Inode = Inode::new(3, InodeKind::Directory, DEFAULT_DIR_MODE);

        inode.save(&store).await.unwrap();
        let loaded: Option<Inode> = Inode::load(&store, 3).await.unwrap();
        assert_eq!(loaded, Some(inode));

        Inode::remove(&store, 3).await.unwrap();
        assert_eq!(Inode::load(&store, 3).await.unwrap(), None);
    }

    #[test]
    fn test_block_id() {
        assert_eq!(block_id(5, 0), "5.0");
        assert_eq!(block_id(12, 3), "12.3");
    }
}
