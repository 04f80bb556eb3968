// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Compiled module cache
//!
//! Each module's bytes are read and compiled at most once per cache. The
//! compiled `Module` is reused across runs; instances never are.

use crate::backends::wasm::detector::{ensure_core_module, vet_imports};
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::loader::load_wasm_bytes;
use crate::backends::wasm::ModuleRef;
use crate::config::ModuleSources;
use crate::observability::messages::wasm::{ModuleCompiled, ModuleLoadFailed};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use wasmtime::{Engine, Module};

pub struct ModuleCache {
    engine: Engine,
    sources: ModuleSources,
    max_module_size: usize,
    modules: Mutex<HashMap<ModuleRef, Module>>,
}

impl ModuleCache {
    pub fn new(engine: Engine, sources: ModuleSources, max_module_size: usize) -> Self {
        Self {
            engine,
            sources,
            max_module_size,
            modules: Mutex::new(HashMap::new()),
        }
    }

    /// Return the compiled module, compiling it on first use.
    ///
    /// The lock is held while compiling so two callers racing on a cold
    /// cache still read the file once.
    pub fn get_or_load(&self, module_ref: ModuleRef) -> WasmResult<Module> {
        let mut modules = self.modules.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(module) = modules.get(&module_ref) {
            tracing::trace!(module = module_ref.name(), "Module cache hit");
            return Ok(module.clone());
        }

        let module = self.compile(module_ref)?;
        modules.insert(module_ref, module.clone());
        Ok(module)
    }

    fn compile(&self, module_ref: ModuleRef) -> WasmResult<Module> {
        let path = self.sources.path_for(module_ref);
        let started = Instant::now();

        let bytes = load_wasm_bytes(path, self.max_module_size)?;

        let compiled = ensure_core_module(&bytes)
            .and_then(|_| {
                Module::new(&self.engine, &bytes).map_err(|e| WasmError::ModuleError(e.to_string()))
            })
            .and_then(|module| vet_imports(&module).map(|count| (module, count)));

        match compiled {
            Ok((module, import_count)) => {
                tracing::info!(
                    "{}",
                    ModuleCompiled {
                        module: module_ref.name(),
                        import_count,
                        duration: started.elapsed(),
                    }
                );
                Ok(module)
            }
            Err(error) => {
                tracing::error!(
                    "{}",
                    ModuleLoadFailed {
                        module_path: &path.display().to_string(),
                        error: &error,
                    }
                );
                Err(error)
            }
        }
    }

    pub fn is_cached(&self, module_ref: ModuleRef) -> bool {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&module_ref)
    }

    pub fn cached_count(&self) -> usize {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every compiled module.
    pub fn clear(&self) {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
