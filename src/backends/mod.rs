// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Module executor backends.
//!
//! ## WASM Backend
//! Runs the real Ghostscript and pdfcpu modules under wasmtime with WASI
//! preview 1. This is what the CLI uses.
//!
//! ## Stub Backend (Test-Only)
//! A scripted executor for flow tests (only available in test builds):
//! - **ScriptedExecutor**: answers each request with a closure and records argv
//! - **RecordingReporter**: keeps every status and progress event it receives
//! - **Note**: NOT available in production builds

#[cfg(test)]
pub mod stub;
pub mod wasm;
