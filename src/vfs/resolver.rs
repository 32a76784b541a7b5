//! Path parsing and resolution.

use std::fmt;

use tracing::trace;

use crate::core::{FsError, Result, utils};
use crate::vfs::node::NodeId;
use crate::vfs::tree_fs::TreeFs;

/// Where resolution begins.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Start {
    Root,
    Cwd,
}

/// A parsed path: a starting point and the names to walk from it.
///
/// A leading `/` selects [`Start::Root`]; anything else starts at the working directory.
/// Empty segments are dropped, so `a//b/` is the same path as `a/b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsPath {
    start: Start,
    components: Vec<String>,
}

impl VfsPath {
    pub fn parse(path: &str) -> Self {
        let (absolute, components) = utils::split_path(path);
        let start = if absolute { Start::Root } else { Start::Cwd };
        Self { start, components }
    }

    pub fn start(&self) -> Start {
        self.start
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Splits off the last component. `None` if the path has no components.
    pub fn split_leaf(&self) -> Option<(VfsPath, &str)> {
        let (leaf, parent) = self.components.split_last()?;
        let parent = VfsPath {
            start: self.start,
            components: parent.to_vec(),
        };
        Some((parent, leaf.as_str()))
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.components.is_empty()) {
            (Start::Root, _) => write!(f, "/{}", self.components.join("/")),
            (Start::Cwd, true) => f.write_str("."),
            (Start::Cwd, false) => f.write_str(&self.components.join("/")),
        }
    }
}

impl TreeFs {
    /// Walks `components` from `start`, looking each one up in the current directory.
    ///
    /// Fails with [`FsError::PathNotFound`] on the first missing component or on a
    /// component that has to be traversed but is a plain file. An empty sequence
    /// resolves to `start` itself.
    pub fn resolve(&self, components: &[String], start: Start) -> Result<NodeId> {
        let mut here = match start {
            Start::Root => self.root(),
            Start::Cwd => self.current_dir(),
        };
        for name in components {
            trace!(at = here.index(), name = name.as_str(), "resolving");
            here = match self.lookup(here, name) {
                Ok(next) => next,
                Err(_) => {
                    let path = VfsPath {
                        start,
                        components: components.to_vec(),
                    };
                    return Err(FsError::PathNotFound(path.to_string()));
                }
            };
        }
        Ok(here)
    }

    pub fn resolve_path(&self, path: &VfsPath) -> Result<NodeId> {
        self.resolve(path.components(), path.start())
    }
}
