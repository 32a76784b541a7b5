use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsError>;

/// Errors raised by the tree itself. Each variant carries the name or path it is about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("{0}: already exists")]
    AlreadyExists(String),

    #[error("{0}: no such file or directory")]
    NotFound(String),

    /// Resolution failed somewhere along the path; the failing segment is not reported.
    #[error("{0}: path does not exist")]
    PathNotFound(String),

    #[error("{name}: is a {actual}")]
    TypeMismatch { name: String, actual: &'static str },

    #[error("{0}: cannot be removed because it is not empty")]
    NotEmpty(String),

    #[error("invalid name: '{0}'")]
    InvalidName(String),

    /// A node handle that no longer refers to a live node.
    #[error("stale node handle #{0}")]
    Stale(usize),
}

pub mod utils {
    /// Names `.` and `..` are navigational aliases, never real entries.
    pub fn is_backreference(name: &str) -> bool {
        name == "." || name == ".."
    }

    /// Returns `true` if `name` can be filed as a user entry of a directory.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains('/') && !is_backreference(name)
    }

    /// Splits `path` on `/`. A leading `/` marks the path as absolute.
    /// Empty segments (from `a//b` or a trailing `/`) are dropped.
    pub fn split_path(path: &str) -> (bool, Vec<String>) {
        let absolute = path.starts_with('/');
        let components = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (absolute, components)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_split_relative() {
            let (absolute, parts) = split_path("a/b/c");
            assert!(!absolute);
            assert_eq!(parts, vec!["a", "b", "c"]);
        }

        #[test]
        fn test_split_absolute() {
            let (absolute, parts) = split_path("/a/b");
            assert!(absolute);
            assert_eq!(parts, vec!["a", "b"]);
        }

        #[test]
        fn test_split_collapses_empty_segments() {
            let (absolute, parts) = split_path("a//b/");
            assert!(!absolute);
            assert_eq!(parts, vec!["a", "b"]);

            let (absolute, parts) = split_path("//");
            assert!(absolute);
            assert!(parts.is_empty());
        }

        #[test]
        fn test_split_empty() {
            let (absolute, parts) = split_path("");
            assert!(!absolute);
            assert!(parts.is_empty());
        }

        #[test]
        fn test_valid_names() {
            assert!(is_valid_name("docs"));
            assert!(is_valid_name(".hidden"));
            assert!(!is_valid_name(""));
            assert!(!is_valid_name("."));
            assert!(!is_valid_name(".."));
            assert!(!is_valid_name("a/b"));
        }
    }
}
