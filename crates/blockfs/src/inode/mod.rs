//! INode records and the typed views over them.
//!
//! An inode is the persistable record describing one filesystem entry. The
//! [`DirView`] and [`FileView`] types interpret a directory inode's block
//! as a name table and a regular inode's blocks as byte content; each view
//! can only be constructed for an inode of the matching kind.

mod dir;
mod file;
mod types;

pub use dir::DirView;
pub use file::{FileView, BLOCK_SIZE};
pub use types::{
    BlockId, Ino, Inode, InodeKind, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, ROOT_INODE,
};

pub(crate) use types::block_id;
