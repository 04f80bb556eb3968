// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM file loading and size validation
//!
//! Reads a binary from disk and rejects anything over the configured size.
//! Format checks belong to the detector module.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::observability::messages::wasm::{ModuleLoadFailed, ModuleLoaded};
use std::path::Path;

/// Loads WASM bytes from a file and validates the size
///
/// # Arguments
/// * `path` - Path to the WASM file to load
/// * `max_size` - Largest accepted file, in bytes
///
/// # Returns
/// * `Ok(Vec<u8>)` - The WASM binary bytes
/// * `Err(WasmError)` - If the file cannot be read or is too large
pub fn load_wasm_bytes<P: AsRef<Path>>(path: P, max_size: usize) -> WasmResult<Vec<u8>> {
    let path = path.as_ref();
    let module_path = path.display().to_string();

    let bytes = std::fs::read(path).map_err(|source| {
        let error = WasmError::ModuleRead {
            path: path.to_path_buf(),
            source,
        };
        tracing::error!(
            "{}",
            ModuleLoadFailed {
                module_path: &module_path,
                error: &error,
            }
        );
        error
    })?;

    if bytes.len() > max_size {
        let error = WasmError::ValidationError(format!(
            "WASM file too large: {} bytes (max: {} bytes)",
            bytes.len(),
            max_size
        ));
        tracing::error!(
            "{}",
            ModuleLoadFailed {
                module_path: &module_path,
                error: &error,
            }
        );
        return Err(error);
    }

    tracing::info!(
        "{}",
        ModuleLoaded {
            module_path: &module_path,
            size_bytes: bytes.len(),
        }
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LIMIT: usize = 1024;

    #[test]
    fn test_load_small_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let test_data = b"test wasm data";
        temp_file.write_all(test_data).unwrap();

        let result = load_wasm_bytes(temp_file.path(), LIMIT);
        assert_eq!(result.unwrap(), test_data);
    }

    #[test]
    fn test_file_too_large() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&vec![0u8; LIMIT + 1]).unwrap();

        match load_wasm_bytes(temp_file.path(), LIMIT) {
            Err(WasmError::ValidationError(msg)) => {
                assert!(msg.contains("too large"));
                assert!(msg.contains(&format!("{}", LIMIT + 1)));
            }
            other => panic!("Expected ValidationError for oversized file, got {:?}", other),
        }
    }

    #[test]
    fn test_max_size_boundary() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&vec![0u8; LIMIT]).unwrap();

        let result = load_wasm_bytes(temp_file.path(), LIMIT);
        assert_eq!(result.unwrap().len(), LIMIT);
    }

    #[test]
    fn test_nonexistent_file() {
        let result = load_wasm_bytes("/nonexistent/path/to/gs.wasm", LIMIT);
        assert!(matches!(result, Err(WasmError::ModuleRead { .. })));
    }
}
