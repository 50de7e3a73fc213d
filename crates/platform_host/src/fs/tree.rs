//! In-memory hierarchical filesystem backing the terminal and explorer apps.

use super::{
    error::FsError,
    path::display_path,
    seed::seed_tree,
    types::{FsEntry, FsSnapshot, VNode, VNodeKind},
};

/// Tree-shaped virtual filesystem.
///
/// Paths are segment slices from the root; `.` and `..` carry no special meaning at this level
/// (see [`crate::fs::resolve_session_path`] for shell-style resolution). Every mutation runs through
/// [`VirtualFs::transaction`], so a failed call leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFs {
    root: VNode,
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::seeded()
    }
}

impl VirtualFs {
    /// Creates a filesystem with an empty root directory.
    pub fn empty() -> Self {
        Self {
            root: VNode::empty_root(),
        }
    }

    /// Creates a filesystem holding the default seed tree.
    pub fn seeded() -> Self {
        Self { root: seed_tree() }
    }

    /// Returns the root directory node.
    pub fn root(&self) -> &VNode {
        &self.root
    }

    /// Resolves `path` segment by segment from the root.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] when a segment is missing or an intermediate segment is a file.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<&VNode, FsError> {
        let mut node = &self.root;
        for segment in path {
            node = node
                .child(segment.as_ref())
                .ok_or_else(|| FsError::NotFound(display_path(path)))?;
        }
        Ok(node)
    }

    /// Returns `true` when `path` resolves.
    pub fn exists<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.resolve(path).is_ok()
    }

    /// Returns the kind of the node at `path`.
    pub fn stat<S: AsRef<str>>(&self, path: &[S]) -> Result<VNodeKind, FsError> {
        self.resolve(path).map(VNode::kind)
    }

    /// Lists child names of a directory in insertion order.
    pub fn list<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<String>, FsError> {
        Ok(self
            .dir_children(path)?
            .iter()
            .map(|child| child.name().to_string())
            .collect())
    }

    /// Lists a directory with kind and size columns.
    pub fn entries<S: AsRef<str>>(&self, path: &[S]) -> Result<Vec<FsEntry>, FsError> {
        Ok(self
            .dir_children(path)?
            .iter()
            .map(|child| FsEntry {
                name: child.name().to_string(),
                kind: child.kind(),
                size: child.content().map(|content| content.len() as u64),
            })
            .collect())
    }

    /// Reads file content.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for a missing path and [`FsError::NotAFile`] for a directory.
    pub fn read<S: AsRef<str>>(&self, path: &[S]) -> Result<String, FsError> {
        self.resolve(path)?
            .content()
            .map(str::to_string)
            .ok_or_else(|| FsError::NotAFile(display_path(path)))
    }

    /// Creates or overwrites a file. The parent directory must already exist.
    pub fn write<S: AsRef<str>>(&mut self, path: &[S], content: &str) -> Result<(), FsError> {
        let display = display_path(path);
        let (name, parent) = split_target(path)?;
        self.transaction(|root| {
            let siblings = dir_children_mut(root, parent)?;
            match siblings.iter_mut().find(|child| child.name() == name) {
                Some(VNode::File { content: existing, .. }) => {
                    *existing = content.to_string();
                    Ok(())
                }
                Some(VNode::Directory { .. }) => Err(FsError::NotAFile(display)),
                None => {
                    validate_name(name)?;
                    siblings.push(VNode::file(name, content));
                    Ok(())
                }
            }
        })
    }

    /// Creates an empty file when absent. Existing files are left untouched.
    pub fn touch<S: AsRef<str>>(&mut self, path: &[S]) -> Result<(), FsError> {
        let display = display_path(path);
        let (name, parent) = split_target(path)?;
        self.transaction(|root| {
            let siblings = dir_children_mut(root, parent)?;
            match siblings.iter().find(|child| child.name() == name) {
                Some(VNode::File { .. }) => Ok(()),
                Some(VNode::Directory { .. }) => Err(FsError::NotAFile(display)),
                None => {
                    validate_name(name)?;
                    siblings.push(VNode::file(name, ""));
                    Ok(())
                }
            }
        })
    }

    /// Creates an empty directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::AlreadyExists`] when a sibling with that name exists.
    pub fn mkdir<S: AsRef<str>>(&mut self, path: &[S]) -> Result<(), FsError> {
        let display = display_path(path);
        let (name, parent) = split_target(path)?;
        self.transaction(|root| {
            let siblings = dir_children_mut(root, parent)?;
            if siblings.iter().any(|child| child.name() == name) {
                return Err(FsError::AlreadyExists(display));
            }
            validate_name(name)?;
            siblings.push(VNode::dir(name, Vec::new()));
            Ok(())
        })
    }

    /// Removes a file, or a directory with everything below it.
    pub fn remove<S: AsRef<str>>(&mut self, path: &[S]) -> Result<(), FsError> {
        let display = display_path(path);
        let (name, parent) = split_target(path)?;
        self.transaction(|root| {
            let siblings = dir_children_mut(root, parent)?;
            let index = siblings
                .iter()
                .position(|child| child.name() == name)
                .ok_or(FsError::NotFound(display))?;
            siblings.remove(index);
            Ok(())
        })
    }

    /// Renames a node in place, keeping its position among siblings.
    pub fn rename<S: AsRef<str>>(&mut self, path: &[S], new_name: &str) -> Result<(), FsError> {
        let display = display_path(path);
        let (name, parent) = split_target(path)?;
        validate_name(new_name)?;
        self.transaction(|root| {
            let siblings = dir_children_mut(root, parent)?;
            let index = siblings
                .iter()
                .position(|child| child.name() == name)
                .ok_or_else(|| FsError::NotFound(display.clone()))?;
            if name == new_name {
                return Ok(());
            }
            if siblings.iter().any(|child| child.name() == new_name) {
                let mut target: Vec<&str> = parent.iter().map(AsRef::as_ref).collect();
                target.push(new_name);
                return Err(FsError::AlreadyExists(display_path(&target)));
            }
            siblings[index].set_name(new_name.to_string());
            Ok(())
        })
    }

    /// Replaces the whole tree with the seed tree.
    pub fn reset(&mut self) {
        self.root = seed_tree();
    }

    /// Returns a fully serializable copy of the tree.
    pub fn snapshot(&self) -> FsSnapshot {
        FsSnapshot {
            root: self.root.clone(),
        }
    }

    /// Replaces the tree with `snapshot` after validating its invariants.
    ///
    /// # Errors
    ///
    /// Rejects snapshots whose root is a file, that contain invalid names, or that have duplicate
    /// sibling names. The current tree is kept in that case.
    pub fn restore(&mut self, snapshot: FsSnapshot) -> Result<(), FsError> {
        if snapshot.root.kind() != VNodeKind::Directory {
            return Err(FsError::NotADirectory("/".to_string()));
        }
        validate_subtree(&snapshot.root, &mut Vec::new())?;
        self.root = snapshot.root;
        Ok(())
    }

    /// Builds a filesystem from a snapshot, validating it like [`VirtualFs::restore`].
    pub fn from_snapshot(snapshot: FsSnapshot) -> Result<Self, FsError> {
        let mut fs = Self::empty();
        fs.restore(snapshot)?;
        Ok(fs)
    }

    /// Runs `apply` against a private copy of the tree and commits it only on success.
    pub fn transaction<T>(
        &mut self,
        apply: impl FnOnce(&mut VNode) -> Result<T, FsError>,
    ) -> Result<T, FsError> {
        let mut draft = self.root.clone();
        let out = apply(&mut draft)?;
        self.root = draft;
        Ok(out)
    }

    /// Runs several operations against a copy of the filesystem and keeps them only if all succeed.
    pub fn batch<T, E>(
        &mut self,
        apply: impl FnOnce(&mut VirtualFs) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut draft = self.clone();
        let out = apply(&mut draft)?;
        *self = draft;
        Ok(out)
    }

    fn dir_children<S: AsRef<str>>(&self, path: &[S]) -> Result<&[VNode], FsError> {
        self.resolve(path)?
            .children()
            .ok_or_else(|| FsError::NotADirectory(display_path(path)))
    }
}

fn split_target<S: AsRef<str>>(path: &[S]) -> Result<(&str, &[S]), FsError> {
    path.split_last()
        .map(|(name, parent)| (name.as_ref(), parent))
        .ok_or_else(|| FsError::InvalidPath("/".to_string()))
}

fn dir_children_mut<'a, S: AsRef<str>>(
    root: &'a mut VNode,
    path: &[S],
) -> Result<&'a mut Vec<VNode>, FsError> {
    let mut node = root;
    for segment in path {
        node = match node {
            VNode::Directory { children, .. } => children
                .iter_mut()
                .find(|child| child.name() == segment.as_ref())
                .ok_or_else(|| FsError::NotFound(display_path(path)))?,
            VNode::File { .. } => return Err(FsError::NotFound(display_path(path))),
        };
    }
    match node {
        VNode::Directory { children, .. } => Ok(children),
        VNode::File { .. } => Err(FsError::NotADirectory(display_path(path))),
    }
}

fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_subtree(node: &VNode, path: &mut Vec<String>) -> Result<(), FsError> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for (index, child) in children.iter().enumerate() {
        validate_name(child.name())?;
        path.push(child.name().to_string());
        if children[..index]
            .iter()
            .any(|earlier| earlier.name() == child.name())
        {
            return Err(FsError::AlreadyExists(display_path(path)));
        }
        validate_subtree(child, path)?;
        path.pop();
    }
    Ok(())
}
