use std::fmt;

use crate::core::{FsError, Result};
use crate::vfs::dir_table::DirTable;

/// Stable handle of a node inside the [`TreeFs`](crate::TreeFs) arena.
/// Handles are never reused, so a handle to a removed node stays stale forever.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    PlainFile,
    Directory,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::PlainFile => "plain file",
            NodeKind::Directory => "directory",
        }
    }
}

/// Type-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Words of a plain file, in write order.
    PlainFile(Vec<String>),
    Directory(DirTable),
}

/// A file or a directory stored in the tree.
///
/// * `inode_nr` — identifier handed out by the owning tree's counter at construction.
/// * `name` — the entry name under which the node is filed in its parent;
///   empty only for the root.
/// * `content` — file words or the directory table.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    inode_nr: u64,
    name: String,
    content: Content,
}

impl Node {
    /// Creates a node with empty content. Directory back-references start unset.
    pub fn new(inode_nr: u64, kind: NodeKind, name: impl Into<String>) -> Self {
        let content = match kind {
            NodeKind::PlainFile => Content::PlainFile(Vec::new()),
            NodeKind::Directory => Content::Directory(DirTable::new()),
        };
        Self {
            inode_nr,
            name: name.into(),
            content,
        }
    }

    pub fn inode_nr(&self) -> u64 {
        self.inode_nr
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        match self.content {
            Content::PlainFile(_) => NodeKind::PlainFile,
            Content::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_file(&self) -> bool {
        self.kind() == NodeKind::PlainFile
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    /// Number of words for a plain file, table size (including `.` and `..`) for a directory.
    pub fn entry_count(&self) -> usize {
        match &self.content {
            Content::PlainFile(words) => words.len(),
            Content::Directory(table) => table.size(),
        }
    }

    /// Returns the words of a plain file.
    pub fn words(&self) -> Result<&[String]> {
        match &self.content {
            Content::PlainFile(words) => Ok(words),
            Content::Directory(_) => Err(self.mismatch()),
        }
    }

    /// Replaces the whole content of a plain file.
    pub fn set_words(&mut self, words: Vec<String>) -> Result<()> {
        match &mut self.content {
            Content::PlainFile(data) => {
                *data = words;
                Ok(())
            }
            Content::Directory(_) => Err(mismatch(&self.name, NodeKind::Directory)),
        }
    }

    pub fn table(&self) -> Result<&DirTable> {
        match &self.content {
            Content::Directory(table) => Ok(table),
            Content::PlainFile(_) => Err(self.mismatch()),
        }
    }

    pub fn table_mut(&mut self) -> Result<&mut DirTable> {
        match &mut self.content {
            Content::Directory(table) => Ok(table),
            Content::PlainFile(_) => Err(mismatch(&self.name, NodeKind::PlainFile)),
        }
    }

    fn mismatch(&self) -> FsError {
        mismatch(&self.name, self.kind())
    }
}

fn mismatch(name: &str, actual: NodeKind) -> FsError {
    let name = if name.is_empty() { "/" } else { name };
    FsError::TypeMismatch {
        name: name.to_string(),
        actual: actual.as_str(),
    }
}
