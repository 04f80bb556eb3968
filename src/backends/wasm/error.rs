// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for WASM backend operations.
//!
//! This module defines error types for loading, vetting, compiling and
//! running modules. All errors implement `std::error::Error` via the
//! `thiserror` crate.

use super::ModuleRef;
use crate::vfs::VfsError;
use std::path::PathBuf;
use thiserror::Error;

/// Error message for Component Model binaries.
///
/// Only core modules targeting WASI preview 1 can be driven with an argument
/// vector and an exit code.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: Component Model detected. \
Provide a core module built for wasi_snapshot_preview1.";

/// Error type for all WASM backend operations.
///
/// This enum covers errors from all stages:
/// - Binary loading and vetting
/// - Module compilation
/// - Runtime setup and execution
#[derive(Error, Debug)]
pub enum WasmError {
    /// The module file could not be read.
    #[error("Cannot read module {}", path.display())]
    ModuleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// A Component Model binary was supplied where a core module is required.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error")]
    ParserError(#[from] wasmparser::BinaryReaderError),

    /// Module compilation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// Size limits or imports the host cannot satisfy.
    #[error("Invalid module: {0}")]
    ValidationError(String),

    /// Wasmtime engine or linker setup error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// The WASI context for a run could not be built.
    #[error("WASI setup error: {0}")]
    WasiSetup(String),

    /// The module trapped (or ran out of fuel) instead of exiting.
    #[error("{module} trapped: {message}")]
    Trap { module: ModuleRef, message: String },

    /// Virtual filesystem error while bridging a run.
    #[error("Virtual filesystem error")]
    Vfs(#[from] VfsError),

    /// Host I/O error, such as creating the scratch directory.
    #[error("I/O error")]
    IoError(#[from] std::io::Error),

    /// The blocking task running the module panicked or was cancelled.
    #[error("Execution task failed: {0}")]
    TaskFailed(String),
}

impl WasmError {
    /// True when the module itself failed, as opposed to the host.
    pub fn is_trap(&self) -> bool {
        matches!(self, Self::Trap { .. })
    }

    /// True for failures to obtain a runnable module.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::ModuleRead { .. }
                | Self::InvalidWasmBinary(_)
                | Self::UnsupportedEncoding(_)
                | Self::ParserError(_)
                | Self::ModuleError(_)
                | Self::ValidationError(_)
                | Self::EngineError(_)
        )
    }
}

/// Result type alias for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
