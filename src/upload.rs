// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ToolboxError, ToolboxResult};
use std::path::Path;

/// A file handed to the toolbox: its name and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Name used when a path has no file name component.
    pub const UNNAMED: &'static str = "input.pdf";

    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a host file. The upload is named after the file's last path
    /// component.
    pub async fn from_path(path: impl AsRef<Path>) -> ToolboxResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ToolboxError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(Self::name_for(path), bytes))
    }

    /// The upload name for a host path: its last component.
    pub fn name_for(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| Self::UNNAMED.to_string())
    }

    /// Where this file lives in the virtual filesystem.
    pub fn vfs_path(&self) -> String {
        format!("/{}", self.name)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
