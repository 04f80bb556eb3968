// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::artifact::{Artifact, ZIP_CONTENT_TYPE};
use super::PackagingResult;
use crate::vfs::{normalize_path, VirtualFs, ROOT};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip every file under `dir` into `"{archive_stem}.zip"`.
///
/// Entry names are relative to `dir`. Each file is removed from the virtual
/// filesystem once read, and the emptied directories are removed last.
pub fn package_directory(
    vfs: &VirtualFs,
    dir: &str,
    archive_stem: &str,
) -> PackagingResult<Artifact> {
    let dir = normalize_path(dir)?;
    let mut files = Vec::new();
    let mut dirs = vec![dir.clone()];
    collect(vfs, &dir, &mut files, &mut dirs)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let prefix = format!("{}/", dir.trim_end_matches('/'));

    for path in &files {
        let data = vfs.read(path)?;
        vfs.remove(path)?;
        let entry = path.strip_prefix(&prefix).unwrap_or(path);
        writer.start_file(entry, options)?;
        writer.write_all(&data)?;
    }

    let bytes = writer.finish()?.into_inner();

    // Deepest first, so each one is empty by the time it is removed.
    for path in dirs.iter().rev().filter(|path| path.as_str() != ROOT) {
        vfs.remove_dir(path)?;
    }

    tracing::debug!(
        dir = %dir,
        entries = files.len(),
        size_bytes = bytes.len(),
        "Packaged {} file(s) from {} into {}.zip",
        files.len(),
        dir,
        archive_stem
    );

    Ok(Artifact {
        file_name: format!("{}.zip", archive_stem),
        content_type: ZIP_CONTENT_TYPE,
        bytes,
    })
}

fn collect(
    vfs: &VirtualFs,
    dir: &str,
    files: &mut Vec<String>,
    dirs: &mut Vec<String>,
) -> PackagingResult<()> {
    for name in vfs.list_directory(dir)? {
        let path = format!("{}/{}", dir.trim_end_matches('/'), name);
        if vfs.is_dir(&path) {
            dirs.push(path.clone());
            collect(vfs, &path, files, dirs)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
