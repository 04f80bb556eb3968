// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory file tree shared between flows and WASM executions.
//!
//! Paths are absolute and normalized: `input.pdf`, `./input.pdf` and
//! `/input.pdf` all name the same entry because the guest working directory
//! is always `/`. Directories are tracked explicitly so an empty output
//! directory survives until it is removed.

use super::error::{VfsError, VfsResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const ROOT: &str = "/";

/// Normalize a guest path to its absolute form.
///
/// `.` components are dropped and `..` pops one level, stopping at the root.
pub fn normalize_path(path: &str) -> VfsResult<String> {
    if path.is_empty() || path.contains('\0') {
        return Err(VfsError::InvalidPath(path.to_string()));
    }

    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    Ok(format!("/{}", components.join("/")))
}

fn parent_of(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

fn child_prefix(dir: &str) -> String {
    if dir == ROOT {
        ROOT.to_string()
    } else {
        format!("{}/", dir)
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Tree {
    pub(crate) files: BTreeMap<String, Vec<u8>>,
    pub(crate) dirs: BTreeSet<String>,
}

impl Tree {
    fn is_dir(&self, path: &str) -> bool {
        path == ROOT || self.dirs.contains(path)
    }

    /// Create every missing ancestor of `path` (not `path` itself).
    fn ensure_parents(&mut self, path: &str) -> VfsResult<()> {
        let mut ancestors = Vec::new();
        let mut current = parent_of(path);
        while let Some(dir) = current {
            if dir == ROOT {
                break;
            }
            if self.files.contains_key(dir) {
                return Err(VfsError::NotADirectory(dir.to_string()));
            }
            ancestors.push(dir.to_string());
            current = parent_of(dir);
        }
        self.dirs.extend(ancestors);
        Ok(())
    }

    fn children(&self, dir: &str) -> BTreeSet<String> {
        let prefix = child_prefix(dir);
        let direct = |path: &String| -> Option<String> {
            let rest = path.strip_prefix(&prefix)?;
            if rest.is_empty() || rest.contains('/') {
                None
            } else {
                Some(rest.to_string())
            }
        };

        self.files
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, _)| direct(path))
            .chain(
                self.dirs
                    .range(prefix.clone()..)
                    .take_while(|path| path.starts_with(&prefix))
                    .filter_map(&direct),
            )
            .collect()
    }
}

/// Handle to an in-memory filesystem.
///
/// Cloning the handle shares the tree. One instance is owned by a
/// `ToolboxContext`; the compression worker builds its own.
#[derive(Debug, Clone, Default)]
pub struct VirtualFs {
    tree: Arc<RwLock<Tree>>,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `bytes` at `path`, replacing any previous contents.
    ///
    /// Missing parent directories are created.
    pub fn stage(&self, path: &str, bytes: impl Into<Vec<u8>>) -> VfsResult<()> {
        let path = normalize_path(path)?;
        let mut tree = self.write_tree();
        if tree.is_dir(&path) {
            return Err(VfsError::IsADirectory(path));
        }
        tree.ensure_parents(&path)?;
        tree.files.insert(path, bytes.into());
        Ok(())
    }

    /// Read the bytes stored at `path`.
    pub fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        let path = normalize_path(path)?;
        let tree = self.read_tree();
        match tree.files.get(&path) {
            Some(bytes) => Ok(bytes.clone()),
            None if tree.is_dir(&path) => Err(VfsError::IsADirectory(path)),
            None => Err(VfsError::NotFound(path)),
        }
    }

    /// Delete the file at `path`. A second call fails with `NotFound`.
    pub fn remove(&self, path: &str) -> VfsResult<()> {
        let path = normalize_path(path)?;
        let mut tree = self.write_tree();
        if tree.files.remove(&path).is_some() {
            return Ok(());
        }
        if tree.is_dir(&path) {
            Err(VfsError::IsADirectory(path))
        } else {
            Err(VfsError::NotFound(path))
        }
    }

    /// Sorted names of the immediate children of a directory.
    pub fn list_directory(&self, path: &str) -> VfsResult<Vec<String>> {
        let path = normalize_path(path)?;
        let tree = self.read_tree();
        if tree.files.contains_key(&path) {
            return Err(VfsError::NotADirectory(path));
        }
        if !tree.is_dir(&path) {
            return Err(VfsError::NotFound(path));
        }
        Ok(tree.children(&path).into_iter().collect())
    }

    /// Create a directory and any missing parents.
    pub fn create_dir(&self, path: &str) -> VfsResult<()> {
        let path = normalize_path(path)?;
        let mut tree = self.write_tree();
        if tree.files.contains_key(&path) {
            return Err(VfsError::NotADirectory(path));
        }
        if path == ROOT {
            return Ok(());
        }
        tree.ensure_parents(&path)?;
        tree.dirs.insert(path);
        Ok(())
    }

    /// Remove an empty directory.
    pub fn remove_dir(&self, path: &str) -> VfsResult<()> {
        let path = normalize_path(path)?;
        let mut tree = self.write_tree();
        if path == ROOT {
            return Err(VfsError::InvalidPath(path));
        }
        if tree.files.contains_key(&path) {
            return Err(VfsError::NotADirectory(path));
        }
        if !tree.dirs.contains(&path) {
            return Err(VfsError::NotFound(path));
        }
        if !tree.children(&path).is_empty() {
            return Err(VfsError::DirectoryNotEmpty(path));
        }
        tree.dirs.remove(&path);
        Ok(())
    }

    /// Remove a directory and everything below it.
    pub fn remove_dir_all(&self, path: &str) -> VfsResult<()> {
        let path = normalize_path(path)?;
        let mut tree = self.write_tree();
        if path == ROOT {
            return Err(VfsError::InvalidPath(path));
        }
        if !tree.dirs.contains(&path) {
            return Err(if tree.files.contains_key(&path) {
                VfsError::NotADirectory(path)
            } else {
                VfsError::NotFound(path)
            });
        }
        let prefix = child_prefix(&path);
        tree.files.retain(|p, _| !p.starts_with(&prefix));
        tree.dirs.retain(|p| !p.starts_with(&prefix) && *p != path);
        Ok(())
    }

    pub fn exists(&self, path: &str) -> bool {
        match normalize_path(path) {
            Ok(path) => {
                let tree = self.read_tree();
                tree.files.contains_key(&path) || tree.is_dir(&path)
            }
            Err(_) => false,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        normalize_path(path)
            .map(|path| self.read_tree().is_dir(&path))
            .unwrap_or(false)
    }

    /// Number of files (not directories) in the tree.
    pub fn file_count(&self) -> usize {
        self.read_tree().files.len()
    }

    /// Drop every file and directory.
    pub fn clear(&self) {
        let mut tree = self.write_tree();
        tree.files.clear();
        tree.dirs.clear();
    }
}
