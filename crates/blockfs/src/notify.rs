//! Lifecycle notifications for filesystem observers.

use serde::Serialize;

use crate::inode::InodeKind;

/// Named lifecycle event emitted by the filesystem.
///
/// Serializable so embedders (window managers, monitors) can forward
/// events to their own UI layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FsEvent {
    /// Filesystem mounted and ready to serve requests.
    Ready,
    /// An entry was created.
    Created {
        /// Canonical path of the new entry.
        path: String,
        /// Kind of the new entry.
        kind: InodeKind,
    },
    /// A file's content changed.
    Modified {
        /// Canonical path of the modified entry.
        path: String,
    },
    /// An entry was deleted.
    Deleted {
        /// Canonical path of the removed entry.
        path: String,
        /// Kind of the removed entry.
        kind: InodeKind,
    },
}

/// Callback trait for lifecycle events.
///
/// Events are fire-and-forget: the filesystem does not wait for or
/// inspect any acknowledgment.
pub trait FsObserver: Send + Sync {
    /// Called once per emitted event.
    fn on_event(&self, event: &FsEvent);
}
