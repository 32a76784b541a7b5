//! This module provides the in-memory tree: an arena of nodes addressed by stable handles.

use tracing::{debug, warn};

use crate::core::{FsError, Result, utils};
use crate::vfs::dir_table::BackRef;
use crate::vfs::node::{Node, NodeId, NodeKind};

/// Default prompt text shown by the shell.
pub const DEFAULT_PROMPT: &str = "% ";

/// An in-memory hierarchical file system.
///
/// ### Internal state
///
/// * `nodes` — the arena. A slot holds `Some(node)` while the node is live and
///   becomes `None` forever once it is removed; slots are never reused.
/// * `root` — handle of the root directory, fixed for the lifetime of the tree.
/// * `cwd` — handle of the current working directory.
/// * `next_inode_nr` — identifier given to the next allocated node.
///
/// ### Invariants
///
/// 1. **Ownership**: every live node except the root is reachable from the root through
///    owning entries; `.` and `..` never count as ownership.
/// 2. **Wiring**: every directory's `.` points at the root and its `..` at the
///    directory owning it. The root's `.` and `..` both point at itself.
/// 3. **cwd**: `cwd` always refers to a live directory. A removal that kills it
///    re-anchors it at the root.
/// 4. **Identifiers**: `inode_nr`s increase monotonically and are never handed out twice.
///
/// ### Example
///
/// ```
/// use tree_vfs::TreeFs;
///
/// let mut fs = TreeFs::new();
/// let root = fs.root();
/// let docs = fs.make_directory(root, "docs").unwrap();
/// let note = fs.make_file(docs, "note").unwrap();
/// fs.write_file(note, vec!["hello".into()]).unwrap();
///
/// assert_eq!(fs.render(note).unwrap(), "hello");
/// fs.remove(docs, "note").unwrap();
/// fs.remove(root, "docs").unwrap();
/// ```
#[derive(Debug)]
pub struct TreeFs {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    cwd: NodeId,
    next_inode_nr: u64,
    prompt: String,
}

impl Default for TreeFs {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFs {
    /// Creates a tree holding only the root directory. Both `root` and `cwd` refer to it.
    pub fn new() -> Self {
        let mut fs = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            cwd: NodeId(0),
            next_inode_nr: 1,
            prompt: DEFAULT_PROMPT.to_string(),
        };
        let root = fs.alloc(NodeKind::Directory, "");
        if let Some(Some(node)) = fs.nodes.get_mut(root.0) {
            if let Ok(table) = node.table_mut() {
                table.set_backreference(BackRef::Dot, Some(root));
                table.set_backreference(BackRef::DotDot, Some(root));
            }
        }
        fs.root = root;
        fs.cwd = root;
        debug!(root = root.0, "file system initialized");
        fs
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current_dir(&self) -> NodeId {
        self.cwd
    }

    /// Replaces `cwd`. The caller is expected to have resolved `node` to a live directory.
    pub fn set_current_dir(&mut self, node: NodeId) {
        debug!(from = self.cwd.0, to = node.0, "cwd changed");
        self.cwd = node;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn change_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(FsError::Stale(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(FsError::Stale(id.0))
    }

    fn alloc(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let inode_nr = self.next_inode_nr;
        self.next_inode_nr += 1;
        self.nodes.push(Some(Node::new(inode_nr, kind, name)));
        debug!(inode_nr, slot = id.0, %kind, name, "node allocated");
        id
    }

    /// Words of a file, table size of a directory.
    pub fn entry_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.entry_count())
    }

    /// Looks `name` up in directory `dir`, back-references included.
    pub fn lookup(&self, dir: NodeId, name: &str) -> Result<NodeId> {
        self.node(dir)?
            .table()?
            .lookup(name)
            .map(|link| link.target())
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    /// Creates directory `name` inside `dir`, wiring its `.` to the root and `..` to `dir`.
    pub fn make_directory(&mut self, dir: NodeId, name: &str) -> Result<NodeId> {
        if self.node(dir)?.table()?.contains(name) {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        if !utils::is_valid_name(name) {
            return Err(FsError::InvalidName(name.to_string()));
        }
        let id = self.alloc(NodeKind::Directory, name);
        let root = self.root;
        let table = self.node_mut(id)?.table_mut()?;
        table.set_backreference(BackRef::Dot, Some(root));
        table.set_backreference(BackRef::DotDot, Some(dir));
        self.node_mut(dir)?.table_mut()?.insert(name, id);
        debug!(parent = dir.0, name, "directory created");
        Ok(id)
    }

    /// Returns the entry `name` of `dir` if it exists, otherwise creates an empty plain file.
    pub fn make_file(&mut self, dir: NodeId, name: &str) -> Result<NodeId> {
        if let Some(link) = self.node(dir)?.table()?.lookup(name) {
            return Ok(link.target());
        }
        if !utils::is_valid_name(name) {
            return Err(FsError::InvalidName(name.to_string()));
        }
        let id = self.alloc(NodeKind::PlainFile, name);
        self.node_mut(dir)?.table_mut()?.insert(name, id);
        debug!(parent = dir.0, name, "file created");
        Ok(id)
    }

    /// Removes entry `name` from `dir`. Directories must be empty.
    ///
    /// A removed directory has its `.` and `..` cleared before its entry is erased.
    pub fn remove(&mut self, dir: NodeId, name: &str) -> Result<()> {
        if utils::is_backreference(name) {
            return Err(FsError::InvalidName(name.to_string()));
        }
        let target = self
            .node(dir)?
            .table()?
            .child(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;

        let node = self.node_mut(target)?;
        if node.is_dir() {
            if node.entry_count() != 2 {
                return Err(FsError::NotEmpty(name.to_string()));
            }
            let table = node.table_mut()?;
            table.set_backreference(BackRef::Dot, None);
            table.set_backreference(BackRef::DotDot, None);
        }

        self.node_mut(dir)?.table_mut()?.erase(name);
        self.nodes[target.0] = None;
        debug!(parent = dir.0, name, "entry removed");
        self.reanchor_cwd();
        Ok(())
    }

    /// Removes entry `name` from `dir` together with everything below it.
    pub fn remove_recursive(&mut self, dir: NodeId, name: &str) -> Result<()> {
        if utils::is_backreference(name) {
            return Err(FsError::InvalidName(name.to_string()));
        }
        let target = self.lookup(dir, name)?;
        if self.node(target)?.is_dir() {
            self.clear(target)?;
        }
        self.remove(dir, name)
    }

    /// Removes directory `node` and its whole subtree, finding its owner through `..`.
    /// For the root, only the contents are removed.
    pub fn remove_tree(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return self.clear(node);
        }
        let parent = self.backreference(node, BackRef::DotDot)?;
        let name = self.node(node)?.name().to_string();
        self.remove_recursive(parent, &name)
    }

    /// Removes every user entry of directory `dir`, depth first. `dir` itself stays.
    pub fn clear(&mut self, dir: NodeId) -> Result<()> {
        let children: Vec<(String, NodeId)> = self
            .node(dir)?
            .table()?
            .children()
            .map(|(name, id)| (name.to_string(), id))
            .collect();
        for (name, child) in children {
            if self.node(child)?.is_dir() {
                self.clear(child)?;
            }
            self.remove(dir, &name)?;
        }
        Ok(())
    }

    pub fn list_names(&self, dir: NodeId) -> Result<Vec<String>> {
        Ok(self.node(dir)?.table()?.list_names())
    }

    pub fn backreference(&self, dir: NodeId, key: BackRef) -> Result<NodeId> {
        self.node(dir)?
            .table()?
            .backreference(key)
            .ok_or_else(|| FsError::NotFound(key.key().to_string()))
    }

    pub fn set_backreference(
        &mut self,
        dir: NodeId,
        key: BackRef,
        target: Option<NodeId>,
    ) -> Result<()> {
        self.node_mut(dir)?.table_mut()?.set_backreference(key, target);
        Ok(())
    }

    /// Overwrites the content of a plain file.
    pub fn write_file(&mut self, file: NodeId, words: Vec<String>) -> Result<()> {
        let node = self.node_mut(file)?;
        node.set_words(words)?;
        debug!(file = file.0, words = node.entry_count(), "file written");
        Ok(())
    }

    pub fn read_file(&self, file: NodeId) -> Result<&[String]> {
        self.node(file)?.words()
    }

    /// A plain file renders as its words joined by spaces; a directory renders one
    /// line per entry: identifier, size, name and a trailing `/` for subdirectories.
    pub fn render(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        let table = match node.table() {
            Ok(table) => table,
            Err(_) => return Ok(node.words()?.join(" ")),
        };
        let mut lines = Vec::with_capacity(table.size());
        for (name, link) in table.iter() {
            let entry = self.node(link.target())?;
            let slash = if link.is_owned() && entry.is_dir() {
                "/"
            } else {
                ""
            };
            lines.push(format!(
                "{:>5} {} {}{}",
                entry.inode_nr(),
                entry.entry_count(),
                name,
                slash
            ));
        }
        Ok(lines.join("\n"))
    }

    /// Absolute path of directory `dir`, built by following `..` up to the root.
    pub fn path_of(&self, dir: NodeId) -> Result<String> {
        let mut names = Vec::new();
        let mut here = dir;
        while here != self.root {
            if names.len() > self.nodes.len() {
                return Err(FsError::Stale(dir.0));
            }
            names.push(self.node(here)?.name().to_string());
            here = self.backreference(here, BackRef::DotDot)?;
        }
        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }

    /// Handles of every node reachable from the root through owning entries, in
    /// depth-first order, root first.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut seen = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            seen.push(id);
            if let Ok(table) = node.table() {
                let mut owned: Vec<NodeId> = table.children().map(|(_, child)| child).collect();
                owned.reverse();
                stack.extend(owned);
            }
        }
        seen
    }

    /// Number of live nodes in the arena, root included.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    fn reanchor_cwd(&mut self) {
        if !self.is_live(self.cwd) {
            warn!(cwd = self.cwd.0, "working directory removed, returning to root");
            self.cwd = self.root;
        }
    }
}
