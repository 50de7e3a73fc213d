//! Hierarchical virtual filesystem: node types, path helpers, the seed tree, and tree operations.

pub mod error;
pub mod path;
pub mod seed;
pub mod tree;
pub mod types;

pub use error::FsError;
pub use path::{display_path, parse_absolute_path, resolve_session_path};
pub use seed::{seed_tree, DEFAULT_HOME};
pub use tree::VirtualFs;
pub use types::{FsEntry, FsSnapshot, VNode, VNodeKind, FS_SNAPSHOT_SCHEMA_VERSION};
