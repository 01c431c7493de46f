//! Directory view: a name-indexed view over a directory inode's block.

use std::collections::BTreeMap;

use blockfs_store::{BlockStore, Namespace};

use crate::error::VfsError;

use super::types::{block_id, BlockId, Ino, Inode};

/// Name → inode-number view over a directory inode.
///
/// The entry table is serialized into a single block owned by the inode
/// and is only ever materialized through it, never cached independently.
/// A view can only be constructed for a directory inode. The view never
/// recurses into children; walking is the orchestrator's job.
pub struct DirView<'a> {
    inode: &'a mut Inode,
}

impl<'a> DirView<'a> {
    /// Construct a view over a directory inode.
    ///
    /// # Arguments
    /// * `inode` - The backing inode
    ///
    /// # Returns
    /// The view, or None if the inode is not a directory.
    pub fn new(inode: &'a mut Inode) -> Option<Self> {
        if inode.is_directory() {
            Some(Self { inode })
        } else {
            None
        }
    }

    /// Deserialize the current entry table.
    ///
    /// # Arguments
    /// * `store` - Block store to read from
    ///
    /// # Returns
    /// The name → inode-number mapping; empty for a childless directory.
    pub async fn entries(&self, store: &dyn BlockStore) -> Result<BTreeMap<String, Ino>, VfsError> {
        let id: &BlockId = match self.inode.blocks.first() {
            Some(id) => id,
            None => return Ok(BTreeMap::new()),
        };
        let data: Vec<u8> = store
            .get(Namespace::Blocks, id)
            .await?
            .ok_or_else(|| VfsError::MissingBlock { block: id.clone() })?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Look up a single entry by name.
    ///
    /// # Arguments
    /// * `store` - Block store to read from
    /// * `name` - Entry name
    ///
    /// # Returns
    /// The child inode number, or None if absent.
    pub async fn entry(&self, store: &dyn BlockStore, name: &str) -> Result<Option<Ino>, VfsError> {
        let entries: BTreeMap<String, Ino> = self.entries(store).await?;
        Ok(entries.get(name).copied())
    }

    /// Number of entries.
    pub async fn len(&self, store: &dyn BlockStore) -> Result<usize, VfsError> {
        Ok(self.entries(store).await?.len())
    }

    /// Whether the directory has no entries.
    pub async fn is_empty(&self, store: &dyn BlockStore) -> Result<bool, VfsError> {
        Ok(self.len(store).await? == 0)
    }

    /// Insert an entry and persist the inode.
    ///
    /// Duplicate names are rejected; names are unique per directory.
    ///
    /// # Arguments
    /// * `store` - Block store to write to
    /// * `name` - Entry name
    /// * `ino` - Child inode number
    pub async fn add_entry(
        &mut self,
        store: &dyn BlockStore,
        name: &str,
        ino: Ino,
    ) -> Result<(), VfsError> {
        let mut entries: BTreeMap<String, Ino> = self.entries(store).await?;
        if entries.contains_key(name) {
            return Err(VfsError::AlreadyExists {
                path: name.to_string(),
            });
        }
        entries.insert(name.to_string(), ino);
        self.write_entries(store, &entries).await
    }

    /// Remove an entry and persist the inode.
    ///
    /// The caller guarantees the entry exists; removing a missing name is
    /// an implementation error, not a filesystem error.
    ///
    /// # Arguments
    /// * `store` - Block store to write to
    /// * `name` - Entry name to remove
    pub async fn remove_entry(&mut self, store: &dyn BlockStore, name: &str) -> Result<(), VfsError> {
        let mut entries: BTreeMap<String, Ino> = self.entries(store).await?;
        let removed: Option<Ino> = entries.remove(name);
        debug_assert!(removed.is_some(), "removed missing entry {:?}", name);
        self.write_entries(store, &entries).await
    }

    /// Re-serialize the table into the inode's block and persist both.
    async fn write_entries(
        &mut self,
        store: &dyn BlockStore,
        entries: &BTreeMap<String, Ino>,
    ) -> Result<(), VfsError> {
        let id: BlockId = block_id(self.inode.ino, 0);
        let data: Vec<u8> = serde_json::to_vec(entries)?;
        store.put(Namespace::Blocks, &id, &data).await?;
        if self.inode.blocks.is_empty() {
            self.inode.blocks.push(id);
        }
        self.inode.save(store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inode::{InodeKind, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
    use blockfs_store::MemoryBlockStore;

    fn dir_inode(ino: Ino) -> Inode {
        Inode::new(ino, InodeKind::Directory, DEFAULT_DIR_MODE)
    }

    #[test]
    fn test_view_rejects_regular_inode() {
        let mut file: Inode = Inode::new(2, InodeKind::Regular, DEFAULT_FILE_MODE);
        assert!(DirView::new(&mut file).is_none());
    }

    #[tokio::test]
    async fn test_fresh_directory_is_empty() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut inode: Inode = dir_inode(1);

        let dir: DirView<'_> = DirView::new(&mut inode).unwrap();
        assert!(dir.is_empty(&store).await.unwrap());
        assert_eq!(dir.entry(&store, "anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_and_lookup_entries() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut inode: Inode = dir_inode(1);

        let mut dir: DirView<'_> = DirView::new(&mut inode).unwrap();
        dir.add_entry(&store, "bin", 2).await.unwrap();
        dir.add_entry(&store, "etc", 3).await.unwrap();

        assert_eq!(dir.entry(&store, "bin").await.unwrap(), Some(2));
        assert_eq!(dir.entry(&store, "etc").await.unwrap(), Some(3));
        assert_eq!(dir.len(&store).await.unwrap(), 2);

        // Table survives through the persisted inode
        let reloaded: Inode = Inode::load(&store, 1).await.unwrap().unwrap();
        assert_eq!(reloaded.blocks.len(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_name_fails() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut inode: Inode = dir_inode(1);

        let mut dir: DirView<'_> = DirView::new(&mut inode).unwrap();
        dir.add_entry(&store, "bin", 2).await.unwrap();

        let result = dir.add_entry(&store, "bin", 3).await;
        assert!(matches!(result, Err(VfsError::AlreadyExists { .. })));
        // Existing mapping untouched
        assert_eq!(dir.entry(&store, "bin").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let store: MemoryBlockStore = MemoryBlockStore::new();
        let mut inode: Inode = dir_inode(1);

        let mut dir: DirView<'_> = DirView::new(&mut inode).unwrap();
        dir.add_entry(&store, "bin", 2).await.unwrap();
        dir.add_entry(&store, "etc", 3).await.unwrap();

        dir.remove_entry(&store, "bin").await.unwrap();

        assert_eq!(dir.entry(&store, "bin").await.unwrap(), None);
        assert_eq!(dir.entry(&store, "etc").await.unwrap(), Some(3));
        assert_eq!(dir.len(&store).await.unwrap(), 1);
    }
}
