// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for the in-memory virtual filesystem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`VirtualFs`](super::VirtualFs) operations.
///
/// The variants mirror the POSIX errors a WASI guest would see for the same
/// situation, so a message read in a log means the same thing whether the
/// host or the guest hit it.
#[derive(Error, Debug)]
pub enum VfsError {
    /// The path was never written, or it was already removed.
    #[error("No such file or directory: {0}")]
    NotFound(String),

    /// A path component that must be a directory is a file.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A file operation was attempted on a directory.
    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// `remove_dir` on a directory that still has children.
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Empty paths, NUL bytes, or operations the root does not allow.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Copying the tree to or from a host directory failed.
    #[error("Host filesystem error at {}", path.display())]
    Host {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VfsError {
    /// True for the error a repeated `remove` produces.
    ///
    /// Cleanup code uses this to treat double removal as noise.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn host(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Host {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for virtual filesystem operations.
pub type VfsResult<T> = Result<T, VfsError>;
