//! Inode-based virtual filesystem over an asynchronous key-value block
//! store.
//!
//! Provides POSIX-like path operations (stat, list, create, read, write,
//! delete) for directories and files. All state lives in a [`BlockStore`]:
//! inode records in one namespace, content blocks in the other, plus a
//! single superblock record for the allocator counters.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: Vfs (path resolution, CRUD orchestration, notifications)
//! Layer 2: Views (DirView: name table, FileView: chunked content)
//! Layer 1: Records (Superblock, Inode) over the BlockStore
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use blockfs::{MemoryBlockStore, Vfs};
//!
//! # async fn demo() -> Result<(), blockfs::VfsError> {
//! let mut vfs = Vfs::mount(Arc::new(MemoryBlockStore::new())).await?;
//! vfs.mkdir("/var").await?;
//! vfs.write_file("/var/notes.txt", b"hello", false).await?;
//! assert_eq!(vfs.read_file("/var/notes.txt").await?, b"hello");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fs;
pub mod inode;
pub mod notify;
pub mod path;
pub mod superblock;

pub use error::VfsError;
pub use fs::Vfs;
pub use inode::{
    BlockId, DirView, FileView, Ino, Inode, InodeKind, BLOCK_SIZE, DEFAULT_DIR_MODE,
    DEFAULT_FILE_MODE, ROOT_INODE,
};
pub use notify::{FsEvent, FsObserver};
pub use superblock::Superblock;

// Re-export the store boundary for convenience
pub use blockfs_store::{BlockStore, DiskBlockStore, MemoryBlockStore, Namespace, StoreError};
