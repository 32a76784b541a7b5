mod dir_table;
mod node;
mod resolver;
mod tree_fs;

pub use dir_table::{BackRef, DirTable, Link};
pub use node::{Content, Node, NodeId, NodeKind};
pub use resolver::{Start, VfsPath};
pub use tree_fs::{DEFAULT_PROMPT, TreeFs};
