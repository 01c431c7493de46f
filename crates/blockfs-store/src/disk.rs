//! Disk-backed block store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::traits::{BlockStore, Namespace};

/// Store keeping one file per record under a root directory.
///
/// Records survive a restart, which makes this the backend for mounts that
/// must come back after a "reboot". Writes go to a temp file first and are
/// renamed into place.
///
/// # Directory Structure
/// ```text
/// root/
/// ├── inodes/
/// │   ├── superblock
/// │   ├── 1
/// │   └── 2
/// └── blocks/
///     ├── 2.0
///     └── 2.1
/// ```
pub struct DiskBlockStore {
    /// Root directory for record storage.
    root: PathBuf,
}

impl DiskBlockStore {
    /// Create a store rooted at the given directory.
    ///
    /// # Arguments
    /// * `root` - Root directory for record storage
    ///
    /// # Returns
    /// New store instance. Creates the namespace directories if needed.
    pub fn new(root: PathBuf) -> std::io::Result<Self> {
        for ns in Namespace::ALL {
            std::fs::create_dir_all(root.join(ns.as_str()))?;
        }
        Ok(Self { root })
    }

    /// Root directory (for inspection/debugging).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its record file, rejecting keys that cannot be file
    /// names.
    fn record_path(&self, ns: Namespace, key: &str) -> Result<PathBuf, StoreError> {
        let valid: bool = !key.is_empty()
            && key != "."
            && key != ".."
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-');
        if !valid || key.ends_with(".tmp") {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(ns.as_str()).join(key))
    }
}

#[async_trait]
impl BlockStore for DiskBlockStore {
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path: PathBuf = self.record_path(ns, key)?;

        if path.exists() {
            Ok(Some(std::fs::read(&path)?))
        } else {
            Ok(None)
        }
    }

    async fn put(&self, ns: Namespace, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path: PathBuf = self.record_path(ns, key)?;

        // Write atomically (write to temp, then rename)
        let temp_path: PathBuf = path.with_file_name(format!("{}.tmp", key));
        std::fs::write(&temp_path, data)?;
        std::fs::rename(&temp_path, &path)?;

        Ok(())
    }

    async fn delete(&self, ns: Namespace, key: &str) -> Result<(), StoreError> {
        let path: PathBuf = self.record_path(ns, key)?;

        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    async fn clear(&self, ns: Namespace) -> Result<(), StoreError> {
        let dir: PathBuf = self.root.join(ns.as_str());

        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;
        Ok(())
    }
}
