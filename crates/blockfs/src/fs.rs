//! The filesystem orchestrator: the public path-based API.

use std::sync::Arc;

use blockfs_store::{BlockStore, Namespace};

use crate::error::VfsError;
use crate::inode::{
    DirView, FileView, Ino, Inode, InodeKind, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, ROOT_INODE,
};
use crate::notify::{FsEvent, FsObserver};
use crate::path;
use crate::superblock::Superblock;

/// Directories seeded by `format`.
const SEED_DIRS: [&str; 4] = ["/home", "/home/user", "/bin", "/etc"];

/// Seed file written by `format`.
const SEED_FILE: &str = "/home/user/readme.txt";
const SEED_FILE_CONTENT: &[u8] = b"Welcome to blockfs.\n";

/// The virtual filesystem.
///
/// The only component callers address directly: every operation takes a
/// `/`-separated path, resolves it to an inode by walking directory
/// entries from the root, then delegates structural changes to the
/// directory and file views.
///
/// Each instance owns its superblock, so separately mounted filesystems
/// (over separate stores) share no allocator state. Mutating operations
/// take `&mut self`: one call runs its resolve-then-mutate sequence to
/// completion before the next can start, and there is no cancellation,
/// no timeout, and no rollback. A store failure partway through a
/// multi-step operation can leave an orphaned inode behind.
pub struct Vfs {
    store: Arc<dyn BlockStore>,
    superblock: Superblock,
    observers: Vec<Arc<dyn FsObserver>>,
}

impl Vfs {
    /// Create an unmounted filesystem over a store.
    ///
    /// Call [`init`](Self::init) before issuing path operations, or use
    /// [`mount`](Self::mount).
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self {
            store,
            superblock: Superblock::default(),
            observers: Vec::new(),
        }
    }

    /// Create and initialize a filesystem in one step.
    ///
    /// # Arguments
    /// * `store` - Block store holding (or about to hold) the filesystem
    pub async fn mount(store: Arc<dyn BlockStore>) -> Result<Self, VfsError> {
        let mut vfs: Vfs = Self::new(store);
        vfs.init().await?;
        Ok(vfs)
    }

    /// Register a lifecycle observer.
    pub fn subscribe(&mut self, observer: Arc<dyn FsObserver>) {
        self.observers.push(observer);
    }

    /// The allocator counters (for monitors and tests).
    pub fn superblock(&self) -> &Superblock {
        &self.superblock
    }

    /// Mount: load the superblock, format if no root inode exists, and
    /// announce readiness.
    pub async fn init(&mut self) -> Result<(), VfsError> {
        self.superblock = Superblock::load(self.store.as_ref()).await?;
        if Inode::load(self.store.as_ref(), ROOT_INODE).await?.is_none() {
            tracing::info!("no root inode found, formatting");
            self.format().await?;
        }
        self.emit(FsEvent::Ready);
        Ok(())
    }

    /// Destructive re-initialization.
    ///
    /// Clears both store namespaces, resets the allocator, re-allocates
    /// the root directory, and seeds the initial hierarchy.
    pub async fn format(&mut self) -> Result<(), VfsError> {
        tracing::info!("formatting filesystem");
        let store: Arc<dyn BlockStore> = Arc::clone(&self.store);

        store.clear(Namespace::Inodes).await?;
        store.clear(Namespace::Blocks).await?;
        self.superblock.reset(store.as_ref()).await?;

        let root_ino: Ino = self.superblock.allocate(store.as_ref()).await?;
        debug_assert_eq!(root_ino, ROOT_INODE);
        let root: Inode = Inode::new(root_ino, InodeKind::Directory, DEFAULT_DIR_MODE);
        root.save(store.as_ref()).await?;

        for dir in SEED_DIRS {
            self.mkdir(dir).await?;
        }
        self.write_file(SEED_FILE, SEED_FILE_CONTENT, false).await?;
        Ok(())
    }

    /// Resolve a path and return the inode's record.
    pub async fn stat(&self, raw: &str) -> Result<Inode, VfsError> {
        self.resolve(raw).await
    }

    /// List the child names of a directory.
    ///
    /// Order follows the entry table's serialization order and is not
    /// guaranteed sorted.
    pub async fn readdir(&self, raw: &str) -> Result<Vec<String>, VfsError> {
        let display: String = path::clean(raw);
        let mut inode: Inode = self.resolve(raw).await?;
        let dir: DirView<'_> =
            DirView::new(&mut inode).ok_or(VfsError::NotADirectory { path: display })?;
        let entries = dir.entries(self.store.as_ref()).await?;
        Ok(entries.into_keys().collect())
    }

    /// Create a directory.
    pub async fn mkdir(&mut self, raw: &str) -> Result<(), VfsError> {
        let display: String = path::clean(raw);
        tracing::debug!("mkdir {}", path::clean(raw));

        let (parent_path, name) = path::split_parent(raw);
        path::validate_name(name)?;
        let store: Arc<dyn BlockStore> = Arc::clone(&self.store);

        let mut parent: Inode = self.resolve(parent_path).await?;
        let mut dir: DirView<'_> = DirView::new(&mut parent).ok_or_else(|| {
            VfsError::NotADirectory {
                path: path::clean(parent_path),
            }
        })?;
        if dir.entry(store.as_ref(), name).await?.is_some() {
            return Err(VfsError::AlreadyExists { path: display });
        }

        let ino: Ino = self.superblock.allocate(store.as_ref()).await?;
        let child: Inode = Inode::new(ino, InodeKind::Directory, DEFAULT_DIR_MODE);
        child.save(store.as_ref()).await?;
        dir.add_entry(store.as_ref(), name, ino).await?;

        self.emit(FsEvent::Created {
            path: display,
            kind: InodeKind::Directory,
        });
        Ok(())
    }

    /// Remove an empty directory.
    pub async fn rmdir(&mut self, raw: &str) -> Result<(), VfsError> {
        let display: String = path::clean(raw);
        tracing::debug!("rmdir {}", path::clean(raw));

        if path::segments(raw).is_empty() {
            return Err(VfsError::InvalidName {
                name: "/".to_string(),
            });
        }
        let store: Arc<dyn BlockStore> = Arc::clone(&self.store);

        let mut target: Inode = self.resolve(raw).await?;
        {
            let dir: DirView<'_> = DirView::new(&mut target).ok_or_else(|| {
                VfsError::NotADirectory {
                    path: display.clone(),
                }
            })?;
            if !dir.is_empty(store.as_ref()).await? {
                return Err(VfsError::NotEmpty { path: display });
            }
        }

        self.remove_entry_and_inode(raw, &target).await?;
        self.emit(FsEvent::Deleted {
            path: display,
            kind: InodeKind::Directory,
        });
        Ok(())
    }

    /// Read a file's whole content.
    pub async fn read_file(&self, raw: &str) -> Result<Vec<u8>, VfsError> {
        let display: String = path::clean(raw);
        let mut inode: Inode = self.resolve(raw).await?;
        let file: FileView<'_> =
            FileView::new(&mut inode).ok_or(VfsError::IsADirectory { path: display })?;
        file.read(self.store.as_ref()).await
    }

    /// Write a file, creating it if the leaf name does not exist yet.
    ///
    /// # Arguments
    /// * `raw` - File path
    /// * `content` - Bytes to write
    /// * `append` - Extend existing content instead of replacing it
    pub async fn write_file(
        &mut self,
        raw: &str,
        content: &[u8],
        append: bool,
    ) -> Result<(), VfsError> {
        let display: String = path::clean(raw);
        tracing::debug!("write {} ({} bytes, append {})", path::clean(raw), content.len(), append);

        let (parent_path, name) = path::split_parent(raw);
        path::validate_name(name)?;
        let store: Arc<dyn BlockStore> = Arc::clone(&self.store);

        let mut parent: Inode = self.resolve(parent_path).await?;
        let mut dir: DirView<'_> = DirView::new(&mut parent).ok_or_else(|| {
            VfsError::NotADirectory {
                path: path::clean(parent_path),
            }
        })?;

        match dir.entry(store.as_ref(), name).await? {
            Some(existing) => {
                let mut inode: Inode = Inode::load(store.as_ref(), existing)
                    .await?
                    .ok_or_else(|| VfsError::NotFound {
                        path: display.clone(),
                    })?;
                let mut file: FileView<'_> =
                    FileView::new(&mut inode).ok_or_else(|| VfsError::IsADirectory {
                        path: display.clone(),
                    })?;
                file.write(store.as_ref(), content, append).await?;
                self.emit(FsEvent::Modified { path: display });
            }
            None => {
                let ino: Ino = self.superblock.allocate(store.as_ref()).await?;
                let mut inode: Inode = Inode::new(ino, InodeKind::Regular, DEFAULT_FILE_MODE);
                inode.save(store.as_ref()).await?;
                dir.add_entry(store.as_ref(), name, ino).await?;

                let mut file: FileView<'_> =
                    FileView::new(&mut inode).ok_or_else(|| VfsError::IsADirectory {
                        path: display.clone(),
                    })?;
                file.write(store.as_ref(), content, false).await?;
                self.emit(FsEvent::Created {
                    path: display,
                    kind: InodeKind::Regular,
                });
            }
        }
        Ok(())
    }

    /// Delete a file. Directories must use [`rmdir`](Self::rmdir).
    pub async fn unlink(&mut self, raw: &str) -> Result<(), VfsError> {
        let display: String = path::clean(raw);
        tracing::debug!("unlink {}", path::clean(raw));

        let target: Inode = self.resolve(raw).await?;
        if target.is_directory() {
            return Err(VfsError::IsADirectory { path: display });
        }

        self.remove_entry_and_inode(raw, &target).await?;
        self.emit(FsEvent::Deleted {
            path: display,
            kind: InodeKind::Regular,
        });
        Ok(())
    }

    /// Walk the path from the root inode, one directory entry at a time.
    ///
    /// The root path returns the root inode directly. Every non-terminal
    /// step requires a directory and a present entry; there is no
    /// caching, no symlink indirection, and no cycle handling because
    /// directories only ever reference children they created.
    async fn resolve(&self, raw: &str) -> Result<Inode, VfsError> {
        let display: String = path::clean(raw);
        let mut current: Inode = Inode::load(self.store.as_ref(), ROOT_INODE)
            .await?
            .ok_or_else(|| VfsError::NotFound {
                path: "/".to_string(),
            })?;

        for segment in path::segments(raw) {
            let dir: DirView<'_> = DirView::new(&mut current).ok_or_else(|| {
                VfsError::NotADirectory {
                    path: display.clone(),
                }
            })?;
            let child: Ino = dir
                .entry(self.store.as_ref(), segment)
                .await?
                .ok_or_else(|| VfsError::NotFound {
                    path: display.clone(),
                })?;
            current = Inode::load(self.store.as_ref(), child)
                .await?
                .ok_or_else(|| VfsError::NotFound {
                    path: display.clone(),
                })?;
        }
        Ok(current)
    }

    /// Shared teardown for `rmdir`/`unlink`: drop the parent entry, free
    /// the target's blocks, delete its record, release its number.
    async fn remove_entry_and_inode(&mut self, raw: &str, target: &Inode) -> Result<(), VfsError> {
        let store: Arc<dyn BlockStore> = Arc::clone(&self.store);
        let (parent_path, name) = path::split_parent(raw);

        let mut parent: Inode = self.resolve(parent_path).await?;
        let mut dir: DirView<'_> = DirView::new(&mut parent).ok_or_else(|| {
            VfsError::NotADirectory {
                path: path::clean(parent_path),
            }
        })?;
        dir.remove_entry(store.as_ref(), name).await?;

        for id in &target.blocks {
            store.delete(Namespace::Blocks, id).await?;
        }
        Inode::remove(store.as_ref(), target.ino).await?;
        self.superblock.deallocate(store.as_ref()).await?;
        Ok(())
    }

    /// Push an event to every observer, fire-and-forget.
    fn emit(&self, event: FsEvent) {
        tracing::debug!("fs event: {:?}", event);
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfs_store::MemoryBlockStore;

    async fn mounted() -> Vfs {
        Vfs::mount(Arc::new(MemoryBlockStore::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_root_resolves_directly() {
        let vfs: Vfs = mounted().await;
        let root: Inode = vfs.stat("/").await.unwrap();

        assert_eq!(root.ino, ROOT_INODE);
        assert!(root.is_directory());
    }

    #[tokio::test]
    async fn test_doubled_slashes_collapse() {
        let vfs: Vfs = mounted().await;
        let a: Inode = vfs.stat("/home/user").await.unwrap();
        let b: Inode = vfs.stat("//home//user/").await.unwrap();

        assert_eq!(a.ino, b.ino);
    }

    #[tokio::test]
    async fn test_resolution_through_file_fails() {
        let mut vfs: Vfs = mounted().await;
        vfs.write_file("/a", b"x", false).await.unwrap();

        let result = vfs.stat("/a/b/c").await;
        assert!(matches!(result, Err(VfsError::NotADirectory { .. })));
    }

    #[tokio::test]
    async fn test_mkdir_invalid_name() {
        let mut vfs: Vfs = mounted().await;

        assert!(matches!(
            vfs.mkdir("/").await,
            Err(VfsError::InvalidName { .. })
        ));
        assert!(matches!(
            vfs.mkdir("/home/..").await,
            Err(VfsError::InvalidName { .. })
        ));
    }

    #[tokio::test]
    async fn test_separate_mounts_do_not_share_allocator() {
        let vfs_a: Vfs = mounted().await;
        let mut vfs_b: Vfs = mounted().await;

        let before: u64 = vfs_a.superblock().next_ino();
        vfs_b.mkdir("/tmp").await.unwrap();

        assert_eq!(vfs_a.superblock().next_ino(), before);
    }
}
