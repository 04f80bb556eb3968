// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::PackagingResult;
use crate::vfs::VirtualFs;
use std::fs;
use std::path::{Path, PathBuf};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A finished result, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> PackagingResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);
        fs::write(&target, &self.bytes)?;
        Ok(target)
    }
}

/// Read a single output file as a PDF artifact.
///
/// The file stays in the virtual filesystem; cleanup belongs to the flow.
pub fn package_single(vfs: &VirtualFs, path: &str, file_name: &str) -> PackagingResult<Artifact> {
    let bytes = vfs.read(path)?;
    let file_name = file_name.trim_start_matches("./").trim_start_matches('/');
    Ok(Artifact::pdf(file_name, bytes))
}

/// `report.pdf` with suffix `grayscale` becomes `report-grayscale.pdf`.
///
/// Only the last extension is replaced; a name without one keeps its full
/// text as the stem.
pub fn derive_output_name(file_name: &str, suffix: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() && !file_name[idx + 1..].contains('/') => {
            &file_name[..idx]
        }
        _ => file_name,
    };
    format!("{}-{}.pdf", stem, suffix)
}
