// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Copying the virtual tree to and from a host directory.
//!
//! wasmtime-wasi hands a guest its filesystem as preopened host directories,
//! so an execution materializes the tree into a scratch directory, runs the
//! module against it, and then imports whatever the module left behind.

use super::error::{VfsError, VfsResult};
use super::memory::{Tree, VirtualFs, ROOT};
use crate::observability::messages::vfs::{TreeExported, TreeImported};
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::Path;

/// Counts reported after a copy in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: usize,
}

fn host_path(host_root: &Path, guest_path: &str) -> std::path::PathBuf {
    host_root.join(guest_path.trim_start_matches('/'))
}

impl VirtualFs {
    /// Write every directory and file of the tree below `host_root`.
    pub fn export_to(&self, host_root: &Path) -> VfsResult<SyncSummary> {
        let tree = self.read_tree();
        let mut summary = SyncSummary::default();

        for dir in &tree.dirs {
            let target = host_path(host_root, dir);
            fs::create_dir_all(&target).map_err(|e| VfsError::host(&target, e))?;
            summary.directories += 1;
        }

        for (path, bytes) in &tree.files {
            let target = host_path(host_root, path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| VfsError::host(parent, e))?;
            }
            fs::write(&target, bytes).map_err(|e| VfsError::host(&target, e))?;
            summary.files += 1;
            summary.bytes += bytes.len();
        }

        TreeExported {
            host_root: &host_root.display().to_string(),
            files: summary.files,
            bytes: summary.bytes,
        }
        .log();

        Ok(summary)
    }

    /// Replace the tree with the contents of `host_root`.
    ///
    /// Files a guest deleted disappear from the tree; files it created or
    /// rewrote are picked up. Symlinks are skipped.
    pub fn import_from(&self, host_root: &Path) -> VfsResult<SyncSummary> {
        let mut fresh = Tree::default();
        walk(host_root, host_root, &mut fresh)?;

        let summary = SyncSummary {
            files: fresh.files.len(),
            directories: fresh.dirs.len(),
            bytes: fresh.files.values().map(Vec::len).sum(),
        };

        *self.write_tree() = fresh;

        TreeImported {
            host_root: &host_root.display().to_string(),
            files: summary.files,
            bytes: summary.bytes,
        }
        .log();

        Ok(summary)
    }
}

fn walk(host_root: &Path, dir: &Path, tree: &mut Tree) -> VfsResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| VfsError::host(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| VfsError::host(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| VfsError::host(&path, e))?;

        let relative = path
            .strip_prefix(host_root)
            .map_err(|_| VfsError::InvalidPath(path.display().to_string()))?;
        let guest_path = format!(
            "{}{}",
            ROOT,
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        );

        if file_type.is_dir() {
            tree.dirs.insert(guest_path);
            walk(host_root, &path, tree)?;
        } else if file_type.is_file() {
            let bytes = fs::read(&path).map_err(|e| VfsError::host(&path, e))?;
            tree.files.insert(guest_path, bytes);
        }
    }

    Ok(())
}
