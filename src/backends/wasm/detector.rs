// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary vetting
//!
//! Checks that a binary is a core module (not a Component Model component)
//! and that everything it imports is provided by the WASI preview 1 linker.

use crate::backends::wasm::error::{WasmError, WasmResult, WASM_UNSUPPORTED_ENCODING};
use wasmparser::{Encoding, Parser, Payload};
use wasmtime::Module;

/// The only import namespace the host provides.
pub const WASI_PREVIEW1: &str = "wasi_snapshot_preview1";

/// Accepts core modules and rejects components, using the version header.
///
/// # Errors
/// Returns an error if:
/// - The input is empty, truncated, or otherwise not a WASM binary
/// - The binary is a Component Model component
pub fn ensure_core_module(bytes: &[u8]) -> WasmResult<()> {
    let parser = Parser::new(0);

    for payload in parser.parse_all(bytes) {
        if let Payload::Version { encoding, .. } = payload? {
            return match encoding {
                Encoding::Module => Ok(()),
                Encoding::Component => Err(WasmError::UnsupportedEncoding(
                    WASM_UNSUPPORTED_ENCODING.to_string(),
                )),
            };
        }
    }

    Err(WasmError::InvalidWasmBinary(
        "missing WASM version header".to_string(),
    ))
}

/// Fails on the first import outside `wasi_snapshot_preview1`.
///
/// Returns the number of imports on success.
pub fn vet_imports(module: &Module) -> WasmResult<usize> {
    let mut count = 0;
    for import in module.imports() {
        if import.module() != WASI_PREVIEW1 {
            return Err(WasmError::ValidationError(format!(
                "Module imports '{}.{}' which the host does not provide",
                import.module(),
                import.name()
            )));
        }
        count += 1;
    }
    Ok(count)
}
