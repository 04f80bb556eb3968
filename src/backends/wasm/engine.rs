// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wasmtime engine configuration for running WASI preview 1 command modules.

use crate::backends::wasm::error::{WasmError, WasmResult};
use wasmtime::{Config, Engine};

/// Creates the engine shared by every module in a runtime.
///
/// **Enabled:** SIMD and bulk memory, which emscripten and Go toolchains
/// emit. Fuel metering when `meter_fuel` is set.
///
/// **Disabled:** threads, multi-memory, memory64, the Component Model, and
/// epoch interruption (which traps as "interrupt" when left on without a
/// ticker).
pub fn create_engine(meter_fuel: bool) -> WasmResult<Engine> {
    let mut config = Config::new();

    config.wasm_threads(false);
    config.wasm_multi_memory(false);
    config.wasm_memory64(false);
    config.wasm_component_model(false);
    config.consume_fuel(meter_fuel);
    config.epoch_interruption(false);

    tracing::debug!(meter_fuel, "Creating wasmtime engine");

    Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
}
