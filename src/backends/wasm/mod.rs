// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASI preview 1 backend
//!
//! Ghostscript and pdfcpu ship as core WebAssembly modules that expect a
//! POSIX-ish environment: an argument vector, a working directory, stdout and
//! stderr, and an exit code. This backend provides exactly that.
//!
//! - [`loader`] reads module bytes with a size cap
//! - [`detector`] rejects Component Model binaries and unknown imports
//! - [`engine`] builds the wasmtime engine
//! - [`cache`] compiles each module once
//! - [`runtime`] runs a compiled module against a [`VirtualFs`](crate::vfs::VirtualFs)

pub mod cache;
pub mod detector;
pub mod engine;
pub mod error;
pub mod loader;
mod module_ref;
mod request;
pub mod runtime;

pub use cache::ModuleCache;
pub use error::{WasmError, WasmResult};
pub use module_ref::ModuleRef;
pub use request::{split_lines, ExecutionRequest, ExecutionResult};
pub use runtime::WasiRuntime;
