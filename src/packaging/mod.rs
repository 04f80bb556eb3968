// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turning module outputs into downloadable artifacts.
//!
//! A single output file becomes a PDF artifact. A directory of outputs is
//! zipped; its files are removed from the virtual filesystem while zipping
//! and the directory is removed afterwards. That walk is not transactional:
//! if it fails halfway, files already removed are gone.

mod archive;
mod artifact;

pub use archive::package_directory;
pub use artifact::{derive_output_name, package_single, Artifact, PDF_CONTENT_TYPE, ZIP_CONTENT_TYPE};

use crate::vfs::VfsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackagingError {
    #[error("Virtual filesystem error")]
    Vfs(#[from] VfsError),

    #[error("Zip error")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type PackagingResult<T> = Result<T, PackagingError>;
