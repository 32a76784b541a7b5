//! An in-memory hierarchical file system manipulated by a small set of shell commands.
//!
//! ### Overview
//!
//! `tree-vfs` keeps a whole directory tree in process memory: nothing ever touches the disk.
//! [`TreeFs`] owns the tree, [`VfsPath`] turns path strings into resolvable component lists,
//! and the [`shell`] module drives the tree with `ls`, `cd`, `mkdir`, `make`, `rm` and friends.
//!
//! **Key ideas**:
//! - **Arena storage**: nodes live in an arena and are addressed by stable [`NodeId`] handles.
//! - **Owning vs. back links**: user-named entries own their nodes; `.` and `..` are plain
//!   handles that never keep anything alive, so the tree has no ownership cycles.
//! - **Exhaustive typing**: a node is either a plain file or a directory; operations on the
//!   wrong kind fail with [`FsError::TypeMismatch`].
//! - **Deterministic identifiers**: each tree owns its identifier counter, so independent
//!   instances number their nodes identically.

mod core;
pub mod logging;
pub mod shell;
mod vfs;

pub use crate::core::{FsError, Result, utils};
pub use vfs::{
    BackRef, Content, DEFAULT_PROMPT, DirTable, Link, Node, NodeId, NodeKind, Start, TreeFs,
    VfsPath,
};
