//! Virtual filesystem node and snapshot types.

use serde::{Deserialize, Serialize};

/// Schema version stamped on [`FsSnapshot`] payloads.
pub const FS_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Virtual filesystem entry kind.
pub enum VNodeKind {
    /// Text file.
    File,
    /// Directory with insertion-ordered children.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// One node of the virtual filesystem tree.
///
/// Sibling names are unique; the tree operations in [`crate::fs::VirtualFs`] keep it that way.
pub enum VNode {
    /// Text file.
    File {
        /// Name, unique among siblings.
        name: String,
        /// UTF-8 text content.
        #[serde(default)]
        content: String,
    },
    /// Directory.
    Directory {
        /// Name, unique among siblings. The root directory has an empty name.
        name: String,
        /// Children in insertion order.
        #[serde(default)]
        children: Vec<VNode>,
    },
}

impl VNode {
    /// Creates a file node.
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::File {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Creates a directory node.
    pub fn dir(name: impl Into<String>, children: Vec<VNode>) -> Self {
        Self::Directory {
            name: name.into(),
            children,
        }
    }

    /// Creates an empty root directory.
    pub fn empty_root() -> Self {
        Self::dir("", Vec::new())
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Directory { name, .. } => name,
        }
    }

    /// Returns the node kind.
    pub fn kind(&self) -> VNodeKind {
        match self {
            Self::File { .. } => VNodeKind::File,
            Self::Directory { .. } => VNodeKind::Directory,
        }
    }

    /// Returns file content, or `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    /// Returns directory children, or `None` for files.
    pub fn children(&self) -> Option<&[VNode]> {
        match self {
            Self::File { .. } => None,
            Self::Directory { children, .. } => Some(children),
        }
    }

    /// Finds a direct child by name.
    pub fn child(&self, name: &str) -> Option<&VNode> {
        self.children()?.iter().find(|child| child.name() == name)
    }

    pub(crate) fn set_name(&mut self, new_name: String) {
        match self {
            Self::File { name, .. } | Self::Directory { name, .. } => *name = new_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Directory listing row used by explorer-style views and `ls -l`.
pub struct FsEntry {
    /// Base name.
    pub name: String,
    /// File or directory kind.
    pub kind: VNodeKind,
    /// Content length in bytes (files only).
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Fully serialized copy of a filesystem tree.
pub struct FsSnapshot {
    /// Root directory node.
    pub root: VNode,
}
