//! Virtual filesystem error taxonomy.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure of a virtual filesystem operation. Every variant carries the display path.
///
/// Operations that return an error leave the tree unchanged.
pub enum FsError {
    /// A path segment does not exist, or traverses through a file.
    #[error("no such file or directory: {0}")]
    NotFound(String),
    /// A file was required but the path is a directory.
    #[error("is a directory: {0}")]
    NotAFile(String),
    /// A directory was required but the path is a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// A sibling with the same name already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// A node name is empty or contains `/`.
    #[error("invalid name: `{0}`")]
    InvalidName(String),
    /// The operation is not valid for this path (for example removing the root).
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
