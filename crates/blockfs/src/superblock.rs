//! The filesystem-wide allocator and counter record.

use blockfs_store::{BlockStore, Namespace};
use serde::{Deserialize, Serialize};

use crate::error::VfsError;
use crate::inode::{Ino, ROOT_INODE};

/// Reserved key for the superblock record in the inode namespace. Inode
/// keys are decimal numbers, so this cannot collide.
pub(crate) const SUPERBLOCK_KEY: &str = "superblock";

/// Hands out inode numbers and tracks how many are live.
///
/// Owned by the mounted [`Vfs`](crate::Vfs) instance and persisted on
/// every mutation. `next_ino` is monotonic: deallocation decrements the
/// live count but never rewinds the allocator, so inode numbers are not
/// recycled within a filesystem's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Superblock {
    /// Next unallocated inode number.
    next_ino: Ino,
    /// Number of live inodes.
    live_inodes: u64,
}

impl Default for Superblock {
    fn default() -> Self {
        Self {
            next_ino: ROOT_INODE,
            live_inodes: 0,
        }
    }
}

impl Superblock {
    /// Load the persisted superblock record, or defaults if absent.
    ///
    /// # Arguments
    /// * `store` - Block store to read from
    pub async fn load(store: &dyn BlockStore) -> Result<Self, VfsError> {
        match store.get(Namespace::Inodes, SUPERBLOCK_KEY).await? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(Self::default()),
        }
    }

    /// Allocate the next inode number and persist the updated counters.
    ///
    /// # Arguments
    /// * `store` - Block store to persist into
    ///
    /// # Returns
    /// The allocated inode number.
    pub async fn allocate(&mut self, store: &dyn BlockStore) -> Result<Ino, VfsError> {
        let ino: Ino = self.next_ino;
        self.next_ino += 1;
        self.live_inodes += 1;
        self.persist(store).await?;
        Ok(ino)
    }

    /// Release one live inode and persist.
    ///
    /// Does not rewind `next_ino`; the freed number is never handed out
    /// again.
    pub async fn deallocate(&mut self, store: &dyn BlockStore) -> Result<(), VfsError> {
        self.live_inodes = self.live_inodes.saturating_sub(1);
        self.persist(store).await
    }

    /// Restore allocator defaults and persist. Used by `format`.
    pub async fn reset(&mut self, store: &dyn BlockStore) -> Result<(), VfsError> {
        *self = Self::default();
        self.persist(store).await
    }

    /// Next inode number that `allocate` would return.
    pub fn next_ino(&self) -> Ino {
        self.next_ino
    }

    /// Number of live inodes.
    pub fn live_inodes(&self) -> u64 {
        self.live_inodes
    }

    async fn persist(&self, store: &dyn BlockStore) -> Result<(), VfsError> {
        let data: Vec<u8> = serde_json::to_vec(self)?;
        store.put(Namespace::Inodes, SUPERBLOCK_KEY, &data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfs_store::MemoryBlockStore;

    #[tokio::test]
    async fn test_allocation_is_monotonic() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut sb: Superblock = Superblock::default();

        let first: Ino = sb.allocate(&store).await.unwrap();
        let second: Ino = sb.allocate(&store).await.unwrap();

        assert_eq!(first, ROOT_INODE);
        assert_eq!(second, ROOT_INODE + 1);
        assert_eq!(sb.live_inodes(), 2);
    }

    #[tokio::test]
    async fn test_deallocate_never_rewinds() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut sb: Superblock = Superblock::default();

        sb.allocate(&store).await.unwrap();
        sb.allocate(&store).await.unwrap();
        sb.deallocate(&store).await.unwrap();

        assert_eq!(sb.live_inodes(), 1);
        let next: Ino = sb.allocate(&store).await.unwrap();
        assert_eq!(next, ROOT_INODE + 2);
    }

    #[tokio::test]
    async fn test_counters_survive_reload() {
        let store: MemoryBlockStore = MemoryBlockStore::new();

        let mut sb: Superblock = Superblock::default();
        sb.allocate(&store).await.unwrap();
        sb.allocate(&store).await.unwrap();

        let reloaded: Superblock = Superblock::load(&store).await.unwrap();
        assert_eq!(reloaded, sb);
    }

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let sb: Superblock = Superblock::load(&store).await.unwrap();

        assert_eq!(sb.next_ino(), ROOT_INODE);
        assert_eq!(sb.live_inodes(), 0);
    }
}
