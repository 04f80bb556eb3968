// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::{ModuleRef, WasmError};
use crate::observability::messages::ErrorChain;
use crate::packaging::PackagingError;
use crate::vfs::VfsError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything a flow can fail with.
///
/// Each variant renders a status line through [`ToolboxError::user_message`];
/// the `Display` text is the detailed form used in logs.
#[derive(Error, Debug)]
pub enum ToolboxError {
    /// The uploaded file could not be read from the host.
    #[error("Cannot read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be written into the virtual filesystem.
    #[error("Cannot stage {path}")]
    Staging {
        path: String,
        #[source]
        source: VfsError,
    },

    #[error("Cannot load {module}")]
    ModuleLoad {
        module: ModuleRef,
        #[source]
        source: WasmError,
    },

    /// The module exited with a non-zero code.
    #[error("Could not {operation} '{file}' (exit code {exit_code})")]
    Execution {
        operation: String,
        file: String,
        exit_code: i32,
    },

    /// The module trapped instead of exiting.
    #[error("Could not {operation} '{file}'")]
    Trapped {
        operation: String,
        file: String,
        #[source]
        source: WasmError,
    },

    /// pdfcpu rejected the input before processing.
    #[error("'{file}' failed validation (exit code {exit_code})")]
    ValidationFailed { file: String, exit_code: i32 },

    /// The module reported success but its output is missing.
    #[error("Cannot read back {path}")]
    ReadBack {
        path: String,
        #[source]
        source: VfsError,
    },

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    #[error("Unsupported extraction mode '{0}'")]
    UnsupportedMode(String),

    #[error("Extracted metadata is not valid JSON")]
    InvalidMetadata(#[from] serde_json::Error),

    /// The compression worker failed or disappeared.
    #[error("Worker error: {0}")]
    Worker(String),

    /// Host-side runtime failure not tied to a module's own behavior.
    #[error("Runtime error")]
    Runtime(#[source] WasmError),
}

impl ToolboxError {
    /// Sort a runtime error into the variant that best describes it.
    pub fn from_wasm(module: ModuleRef, operation: &str, file: &str, error: WasmError) -> Self {
        if error.is_load_failure() {
            ToolboxError::ModuleLoad {
                module,
                source: error,
            }
        } else if error.is_trap() {
            ToolboxError::Trapped {
                operation: operation.to_string(),
                file: file.to_string(),
                source: error,
            }
        } else {
            ToolboxError::Runtime(error)
        }
    }

    /// The status line shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ToolboxError::FileRead { path, .. } => format!("File reading failed: {}", path.display()),
            ToolboxError::Staging { path, .. } => format!("Error processing {}", path),
            ToolboxError::ModuleLoad { module, .. } => {
                format!("Failed to load {}. Check the module path.", module.program_name())
            }
            ToolboxError::Execution {
                operation, file, ..
            } => format!("Failed to {} {}", operation, file),
            ToolboxError::Trapped { file, .. } => {
                format!("Error processing {}: module aborted", file)
            }
            ToolboxError::ValidationFailed { file, .. } => {
                format!("Validation failed for {}", file)
            }
            ToolboxError::ReadBack { path, .. } => format!("Output {} was not produced", path),
            ToolboxError::Packaging(err) => format!("Packaging failed: {}", ErrorChain(err)),
            ToolboxError::UnsupportedMode(mode) => {
                format!("Extraction mode '{}' not supported yet.", mode)
            }
            ToolboxError::InvalidMetadata(_) => "Failed to read metadata.".to_string(),
            ToolboxError::Worker(message) => format!("Compression failed: {}", message),
            ToolboxError::Runtime(err) => format!("Error: {}", ErrorChain(err)),
        }
    }
}

pub type ToolboxResult<T> = Result<T, ToolboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wasm_sorts_errors() {
        let load = ToolboxError::from_wasm(
            ModuleRef::Pdfcpu,
            "convert",
            "a.pdf",
            WasmError::ModuleError("bad".into()),
        );
        assert!(matches!(load, ToolboxError::ModuleLoad { module: ModuleRef::Pdfcpu, .. }));

        let trap = ToolboxError::from_wasm(
            ModuleRef::Ghostscript,
            "compress",
            "a.pdf",
            WasmError::Trap {
                module: ModuleRef::Ghostscript,
                message: "unreachable".into(),
            },
        );
        assert!(matches!(trap, ToolboxError::Trapped { .. }));

        let other = ToolboxError::from_wasm(
            ModuleRef::Pdfcpu,
            "validate",
            "a.pdf",
            WasmError::TaskFailed("panicked".into()),
        );
        assert!(matches!(other, ToolboxError::Runtime(_)));
    }

    #[test]
    fn test_user_messages() {
        let failed = ToolboxError::Execution {
            operation: "convert".into(),
            file: "f1.pdf".into(),
            exit_code: 1,
        };
        assert_eq!(failed.user_message(), "Failed to convert f1.pdf");

        let mode = ToolboxError::UnsupportedMode("images".into());
        assert_eq!(mode.user_message(), "Extraction mode 'images' not supported yet.");

        let worker = ToolboxError::Worker("output.pdf not found".into());
        assert_eq!(worker.user_message(), "Compression failed: output.pdf not found");
    }

    #[test]
    fn test_cause_is_printed_once_in_error_chain() {
        let error = ToolboxError::FileRead {
            path: PathBuf::from("missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };

        assert_eq!(error.to_string(), "Cannot read missing.pdf");
        assert_eq!(
            format!("{:#}", anyhow::Error::new(error)),
            "Cannot read missing.pdf: No such file or directory"
        );
    }
}
