//! File view: a byte-content view over a regular inode's blocks.

use blockfs_store::{BlockStore, Namespace};

use crate::error::VfsError;

use super::types::{block_id, BlockId, Inode};

/// Content chunk size in bytes. Content longer than one block spreads
/// across multiple blocks in list order.
pub const BLOCK_SIZE: usize = 4096;

/// Byte-content view over a regular inode.
///
/// Concatenating the inode's blocks in order reconstructs exactly the
/// content written. A view can only be constructed for a regular inode.
pub struct FileView<'a> {
    inode: &'a mut Inode,
}

impl<'a> FileView<'a> {
    /// Construct a view over a regular inode.
    ///
    /// # Arguments
    /// * `inode` - The backing inode
    ///
    /// # Returns
    /// The view, or None if the inode is a directory.
    pub fn new(inode: &'a mut Inode) -> Option<Self> {
        if inode.is_regular() {
            Some(Self { inode })
        } else {
            None
        }
    }

    /// Read the whole content.
    ///
    /// # Arguments
    /// * `store` - Block store to read from
    ///
    /// # Returns
    /// The content bytes; an inode with no blocks reads as empty.
    pub async fn read(&self, store: &dyn BlockStore) -> Result<Vec<u8>, VfsError> {
        let mut content: Vec<u8> = Vec::with_capacity(self.inode.size as usize);
        for id in &self.inode.blocks {
            let data: Vec<u8> = store
                .get(Namespace::Blocks, id)
                .await?
                .ok_or_else(|| VfsError::MissingBlock { block: id.clone() })?;
            content.extend_from_slice(&data);
        }
        Ok(content)
    }

    /// Write content, then persist the inode.
    ///
    /// With `append` false the old block list is discarded and its blocks
    /// freed before fresh blocks are written; with `append` true the new
    /// content is encoded as additional blocks extending the list.
    ///
    /// # Arguments
    /// * `store` - Block store to write to
    /// * `content` - Bytes to write
    /// * `append` - Extend instead of replace
    pub async fn write(
        &mut self,
        store: &dyn BlockStore,
        content: &[u8],
        append: bool,
    ) -> Result<(), VfsError> {
        if !append {
            let old: Vec<BlockId> = std::mem::take(&mut self.inode.blocks);
            for id in old {
                store.delete(Namespace::Blocks, &id).await?;
            }
            self.inode.size = 0;
        }

        let mut seq: u64 = next_block_seq(self.inode);
        for chunk in content.chunks(BLOCK_SIZE) {
            let id: BlockId = block_id(self.inode.ino, seq);
            store.put(Namespace::Blocks, &id, chunk).await?;
            self.inode.blocks.push(id);
            seq += 1;
        }

        self.inode.size += content.len() as u64;
        self.inode.save(store).await
    }
}

/// Sequence index for the next block appended to this inode.
///
/// Continues past the current list tail; replaced blocks are freed before
/// the list is dropped, so reuse of a lower index after truncation cannot
/// alias live data.
fn next_block_seq(inode: &Inode) -> u64 {
    inode
        .blocks
        .last()
        .and_then(|id| id.rsplit('.').next())
        .and_then(|s| s.parse::<u64>().ok())
        .map(|seq| seq + 1)
        .unwrap_or(0)
}
