// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for virtual filesystem events.

use crate::observability::messages::{ErrorChain, StructuredLog};
use std::fmt::{Display, Formatter};

/// An uploaded file was written into the virtual filesystem.
///
/// # Log Level
/// `debug!`
pub struct FileStaged<'a> {
    pub path: &'a str,
    pub size_bytes: usize,
}

impl Display for FileStaged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Staged {} ({} bytes)", self.path, self.size_bytes)
    }
}

/// A cleanup removal hit a path that was already gone.
///
/// # Log Level
/// `debug!` - Expected noise, never a failure
pub struct CleanupSkipped<'a> {
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for CleanupSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cleanup of {} skipped: {}", self.path, ErrorChain(self.error))
    }
}

/// The tree was materialized into a host directory before an execution.
pub struct TreeExported<'a> {
    pub host_root: &'a str,
    pub files: usize,
    pub bytes: usize,
}

impl Display for TreeExported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Exported {} files ({} bytes) to {}",
            self.files, self.bytes, self.host_root
        )
    }
}

impl StructuredLog for TreeExported<'_> {
    fn log(&self) {
        tracing::debug!(
            host_root = self.host_root,
            files = self.files,
            bytes = self.bytes,
            "{}", self
        );
    }
}

/// The tree was replaced with a host directory's contents after an execution.
pub struct TreeImported<'a> {
    pub host_root: &'a str,
    pub files: usize,
    pub bytes: usize,
}

impl Display for TreeImported<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Imported {} files ({} bytes) from {}",
            self.files, self.bytes, self.host_root
        )
    }
}

impl StructuredLog for TreeImported<'_> {
    fn log(&self) {
        tracing::debug!(
            host_root = self.host_root,
            files = self.files,
            bytes = self.bytes,
            "{}", self
        );
    }
}
