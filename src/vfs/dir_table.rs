//! Directory entry table: user-named owning entries plus the two structural
//! back-references `.` and `..`.

use std::collections::BTreeMap;

use crate::vfs::node::NodeId;

/// One of the two structural entries every directory carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackRef {
    /// `.`, which points at the tree root.
    Dot,
    /// `..`, which points at the directory owning this table.
    DotDot,
}

impl BackRef {
    pub fn key(&self) -> &'static str {
        match self {
            BackRef::Dot => ".",
            BackRef::DotDot => "..",
        }
    }

    pub fn from_name(name: &str) -> Option<BackRef> {
        match name {
            "." => Some(BackRef::Dot),
            ".." => Some(BackRef::DotDot),
            _ => None,
        }
    }
}

/// A table entry as seen by lookups and listings.
///
/// Only `Owned` links keep a node alive; `Back` links are navigational aliases
/// and are never followed by reachability walks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Link {
    Owned(NodeId),
    Back(NodeId),
}

impl Link {
    pub fn target(&self) -> NodeId {
        match *self {
            Link::Owned(id) | Link::Back(id) => id,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Link::Owned(_))
    }
}

/// Ordered name -> node mapping of a directory.
///
/// ### Invariants
///
/// 1. Keys of `entries` are unique user names; `.` and `..` never appear there.
/// 2. `size()` always counts the two structural entries, so an empty directory has size 2.
/// 3. Listing order is lexicographic over all keys, structural ones included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirTable {
    dot: Option<NodeId>,
    dotdot: Option<NodeId>,
    entries: BTreeMap<String, NodeId>,
}

impl DirTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entry count including `.` and `..`.
    pub fn size(&self) -> usize {
        self.entries.len() + 2
    }

    /// `true` when only `.` and `..` are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Finds `name`, structural entries included. Unset back-references are not found.
    pub fn lookup(&self, name: &str) -> Option<Link> {
        match BackRef::from_name(name) {
            Some(key) => self.backreference(key).map(Link::Back),
            None => self.entries.get(name).copied().map(Link::Owned),
        }
    }

    /// Finds an owning entry only.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    pub fn backreference(&self, key: BackRef) -> Option<NodeId> {
        match key {
            BackRef::Dot => self.dot,
            BackRef::DotDot => self.dotdot,
        }
    }

    /// Replaces a back-reference. `None` clears it.
    pub fn set_backreference(&mut self, key: BackRef, target: Option<NodeId>) {
        match key {
            BackRef::Dot => self.dot = target,
            BackRef::DotDot => self.dotdot = target,
        }
    }

    /// Files `id` under `name`. Returns the previous owner of the name, if any.
    pub(crate) fn insert(&mut self, name: impl Into<String>, id: NodeId) -> Option<NodeId> {
        self.entries.insert(name.into(), id)
    }

    pub(crate) fn erase(&mut self, name: &str) -> Option<NodeId> {
        self.entries.remove(name)
    }

    /// Owning entries in key order.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Every set entry, structural ones included, in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Link)> {
        let mut all: BTreeMap<&str, Link> = self
            .entries
            .iter()
            .map(|(name, id)| (name.as_str(), Link::Owned(*id)))
            .collect();
        for key in [BackRef::Dot, BackRef::DotDot] {
            if let Some(id) = self.backreference(key) {
                all.insert(key.key(), Link::Back(id));
            }
        }
        all.into_iter()
    }

    pub fn list_names(&self) -> Vec<String> {
        self.iter().map(|(name, _)| name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_table() -> DirTable {
        let mut table = DirTable::new();
        table.set_backreference(BackRef::Dot, Some(NodeId(0)));
        table.set_backreference(BackRef::DotDot, Some(NodeId(0)));
        table.insert("b", NodeId(2));
        table.insert("a", NodeId(1));
        table.insert("c", NodeId(3));
        table
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = DirTable::new();
        assert!(table.is_empty());
        assert_eq!(table.size(), 2);
        assert_eq!(table.lookup("."), None);
        assert_eq!(table.lookup(".."), None);
        assert!(table.list_names().is_empty());
    }

    #[test]
    fn test_listing_order() {
        let table = setup_table();
        assert_eq!(table.list_names(), vec![".", "..", "a", "b", "c"]);
        assert_eq!(table.size(), 5);
    }

    #[test]
    fn test_structural_entries_sort_among_names() {
        let mut table = setup_table();
        table.insert("-dash", NodeId(4));
        table.insert(".hidden", NodeId(5));
        assert_eq!(
            table.list_names(),
            vec!["-dash", ".", "..", ".hidden", "a", "b", "c"]
        );
    }

    #[test]
    fn test_lookup_distinguishes_links() {
        let table = setup_table();
        assert_eq!(table.lookup("a"), Some(Link::Owned(NodeId(1))));
        assert_eq!(table.lookup("."), Some(Link::Back(NodeId(0))));
        assert_eq!(table.lookup(".."), Some(Link::Back(NodeId(0))));
        assert_eq!(table.lookup("zzz"), None);
        assert_eq!(table.child("."), None);
        assert!(table.lookup("a").unwrap().is_owned());
        assert!(!table.lookup("..").unwrap().is_owned());
    }

    #[test]
    fn test_children_skip_backreferences() {
        let table = setup_table();
        let names: Vec<_> = table.children().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_set_backreference() {
        let mut table = setup_table();
        table.set_backreference(BackRef::DotDot, Some(NodeId(9)));
        assert_eq!(table.backreference(BackRef::DotDot), Some(NodeId(9)));

        table.set_backreference(BackRef::Dot, None);
        table.set_backreference(BackRef::DotDot, None);
        assert_eq!(table.lookup("."), None);
        assert_eq!(table.list_names(), vec!["a", "b", "c"]);
        // Structural slots are still counted.
        assert_eq!(table.size(), 5);
    }

    #[test]
    fn test_erase() {
        let mut table = setup_table();
        assert_eq!(table.erase("b"), Some(NodeId(2)));
        assert_eq!(table.erase("b"), None);
        assert_eq!(table.list_names(), vec![".", "..", "a", "c"]);
    }

    #[test]
    fn test_backref_keys() {
        assert_eq!(BackRef::from_name("."), Some(BackRef::Dot));
        assert_eq!(BackRef::from_name(".."), Some(BackRef::DotDot));
        assert_eq!(BackRef::from_name("..."), None);
        assert_eq!(BackRef::DotDot.key(), "..");
    }
}
