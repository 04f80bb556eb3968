// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for WASM module loading and execution events.
//!
//! This module contains message types for logging events related to:
//! * Runtime (engine and WASI linker) creation
//! * Module loading, vetting and caching
//! * Execution lifecycle and exit codes

use crate::observability::messages::{ErrorChain, StructuredLog};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// WASM module loaded successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pdfwasm::observability::messages::wasm::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     module_path: "assets/gs.wasm",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes)",
            self.module_path, self.size_bytes
        )
    }
}

/// WASM module loading failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pdfwasm::observability::messages::wasm::ModuleLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = ModuleLoadFailed {
///     module_path: "assets/missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM module '{}': {}",
            self.module_path,
            ErrorChain(self.error)
        )
    }
}

/// A module was compiled and placed in the cache.
///
/// # Log Level
/// `info!`
pub struct ModuleCompiled<'a> {
    pub module: &'a str,
    pub import_count: usize,
    pub duration: Duration,
}

impl Display for ModuleCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled {} module in {:?} ({} imports)",
            self.module, self.duration, self.import_count
        )
    }
}

/// The runtime was created.
///
/// # Log Level
/// `info!`
pub struct RuntimeCreated {
    pub fuel_level: Option<u64>,
}

impl Display for RuntimeCreated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.fuel_level {
            Some(fuel) => write!(f, "Created WASI runtime with fuel_level={}", fuel),
            None => write!(f, "Created WASI runtime without fuel limit"),
        }
    }
}

/// WASM execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pdfwasm::observability::messages::wasm::ExecutionStarted;
///
/// let argv = vec!["pdfcpu".to_string(), "validate".to_string()];
/// let msg = ExecutionStarted {
///     module: "pdfcpu",
///     argv: &argv,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub module: &'a str,
    pub argv: &'a [String],
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executing {} module: {}",
            self.module,
            self.argv.join(" ")
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(module = self.module, argc = self.argv.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "wasm_execution",
            span_name = name,
            module = self.module,
            argc = self.argv.len(),
        )
    }
}

/// WASM execution ran to completion (with any exit code).
///
/// # Log Level
/// `info!` for exit code 0, `warn!` otherwise
pub struct ExecutionCompleted<'a> {
    pub module: &'a str,
    pub exit_code: i32,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} module exited with code {} after {:?}",
            self.module, self.exit_code, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        if self.exit_code == 0 {
            tracing::info!(
                module = self.module,
                exit_code = self.exit_code,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                module = self.module,
                exit_code = self.exit_code,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }
}

/// WASM execution trapped or could not be started.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub module: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "WASM execution failed for {}: {}",
            self.module,
            ErrorChain(self.error)
        )
    }
}
