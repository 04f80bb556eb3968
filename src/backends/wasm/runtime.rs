// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASI preview 1 runtime
//!
//! The engine and linker are built once per runtime. Every run gets a fresh
//! `Store` and instance, a scratch host directory holding a copy of the
//! virtual filesystem (preopened as `/`), and captured stdout/stderr. When
//! the module exits, whatever it left in the scratch directory replaces the
//! virtual tree.
//!
//! ## Exit codes
//! - `_start` returning normally is exit code 0
//! - `proc_exit(n)` is exit code `n`
//! - anything else (a trap, fuel exhaustion) is a [`WasmError::Trap`] and
//!   the virtual tree is left untouched

use crate::backends::wasm::cache::ModuleCache;
use crate::backends::wasm::engine::create_engine;
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::request::{split_lines, ExecutionRequest, ExecutionResult};
use crate::backends::wasm::ModuleRef;
use crate::config::Config;
use crate::observability::messages::wasm::{
    ExecutionCompleted, ExecutionFailed, ExecutionStarted, RuntimeCreated,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ModuleExecutor;
use crate::vfs::VirtualFs;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use wasmtime::{Linker, Store};
use wasmtime_wasi::p1::{self, WasiP1Ctx};
use wasmtime_wasi::p2::pipe::MemoryOutputPipe;
use wasmtime_wasi::{DirPerms, FilePerms, I32Exit, WasiCtxBuilder};

/// Upper bound on captured stdout or stderr per run (1 MB each).
const OUTPUT_CAPTURE_LIMIT: usize = 1024 * 1024;

/// Guest mount point of the scratch directory, and the guest cwd.
const GUEST_ROOT: &str = "/";

/// Runs the configured modules with wasmtime.
///
/// Cloning is cheap and shares the engine, linker and module cache.
#[derive(Clone)]
pub struct WasiRuntime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    engine: wasmtime::Engine,
    linker: Linker<WasiP1Ctx>,
    cache: ModuleCache,
    fuel: Option<u64>,
}

impl WasiRuntime {
    pub fn new(config: &Config) -> WasmResult<Self> {
        let fuel = config.wasm.fuel.effective_limit();
        let engine = create_engine(fuel.is_some())?;

        let mut linker: Linker<WasiP1Ctx> = Linker::new(&engine);
        p1::add_to_linker_sync(&mut linker, |ctx: &mut WasiP1Ctx| ctx)
            .map_err(|e| WasmError::EngineError(format!("Failed to add WASI to linker: {}", e)))?;

        let cache = ModuleCache::new(
            engine.clone(),
            config.modules.clone(),
            config.wasm.get_max_module_size(),
        );

        tracing::info!("{}", RuntimeCreated { fuel_level: fuel });

        Ok(Self {
            inner: Arc::new(RuntimeInner {
                engine,
                linker,
                cache,
                fuel,
            }),
        })
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.inner.cache
    }

    /// Run a module on the current thread.
    pub fn execute_blocking(
        &self,
        module: ModuleRef,
        request: &ExecutionRequest,
        vfs: &VirtualFs,
    ) -> WasmResult<ExecutionResult> {
        self.inner.run(module, request, vfs)
    }
}

impl RuntimeInner {
    fn run(
        &self,
        module_ref: ModuleRef,
        request: &ExecutionRequest,
        vfs: &VirtualFs,
    ) -> WasmResult<ExecutionResult> {
        let module = self.cache.get_or_load(module_ref)?;

        let started = ExecutionStarted {
            module: module_ref.name(),
            argv: request.argv(),
        };
        started.log();
        let _span = started.span("run").entered();

        let scratch = tempfile::tempdir()?;
        vfs.export_to(scratch.path())?;

        let stdout = MemoryOutputPipe::new(OUTPUT_CAPTURE_LIMIT);
        let stderr = MemoryOutputPipe::new(OUTPUT_CAPTURE_LIMIT);

        let mut builder = WasiCtxBuilder::new();
        builder
            .args(request.argv())
            .env("PWD", GUEST_ROOT)
            .stdout(stdout.clone())
            .stderr(stderr.clone());
        builder
            .preopened_dir(scratch.path(), GUEST_ROOT, DirPerms::all(), FilePerms::all())
            .map_err(|e| WasmError::WasiSetup(e.to_string()))?;

        let mut store = Store::new(&self.engine, builder.build_p1());
        if let Some(fuel) = self.fuel {
            store
                .set_fuel(fuel)
                .map_err(|e| WasmError::WasiSetup(e.to_string()))?;
        }

        let started = Instant::now();
        let outcome = self
            .linker
            .instantiate(&mut store, &module)
            .and_then(|instance| instance.get_typed_func::<(), ()>(&mut store, "_start"))
            .and_then(|start| start.call(&mut store, ()));

        let exit_code = match outcome {
            Ok(()) => 0,
            Err(error) => match error.downcast_ref::<I32Exit>() {
                Some(exit) => exit.0,
                None => {
                    let error = WasmError::Trap {
                        module: module_ref,
                        message: format!("{:#}", error),
                    };
                    tracing::error!(
                        "{}",
                        ExecutionFailed {
                            module: module_ref.name(),
                            error: &error,
                        }
                    );
                    return Err(error);
                }
            },
        };

        // Close the guest's file descriptors before reading the directory back.
        drop(store);
        vfs.import_from(scratch.path())?;

        ExecutionCompleted {
            module: module_ref.name(),
            exit_code,
            duration: started.elapsed(),
        }
        .log();

        Ok(ExecutionResult::new(exit_code)
            .with_output(split_lines(&stdout.contents()), split_lines(&stderr.contents())))
    }
}

#[async_trait]
impl ModuleExecutor for WasiRuntime {
    async fn execute(
        &self,
        module: ModuleRef,
        request: &ExecutionRequest,
        vfs: &VirtualFs,
    ) -> WasmResult<ExecutionResult> {
        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let vfs = vfs.clone();

        tokio::task::spawn_blocking(move || inner.run(module, &request, &vfs))
            .await
            .map_err(|e| WasmError::TaskFailed(e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "wasmtime-wasi-p1"
    }

    fn shutdown(&self) {
        self.inner.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const EXIT_THREE: &str = r#"
        (module
          (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
          (memory (export "memory") 1)
          (func (export "_start")
            (call $proc_exit (i32.const 3))))
    "#;

    // Writes "Generating output(3/10)\n" (24 bytes at offset 16) to stdout.
    const PRINTS_PROGRESS: &str = r#"
        (module
          (import "wasi_snapshot_preview1" "fd_write"
            (func $fd_write (param i32 i32 i32 i32) (result i32)))
          (memory (export "memory") 1)
          (data (i32.const 16) "Generating output(3/10)\n")
          (func (export "_start")
            (i32.store (i32.const 0) (i32.const 16))
            (i32.store (i32.const 4) (i32.const 24))
            (drop (call $fd_write (i32.const 1) (i32.const 0) (i32.const 1) (i32.const 8)))))
    "#;

    const TRAPS: &str = r#"
        (module
          (memory (export "memory") 1)
          (func (export "_start") unreachable))
    "#;

    fn runtime_with(dir: &Path, gs_wat: &str, pdfcpu_wat: &str) -> WasiRuntime {
        fs::write(dir.join("gs.wasm"), wat::parse_str(gs_wat).unwrap()).unwrap();
        fs::write(dir.join("pdfcpu.wasm"), wat::parse_str(pdfcpu_wat).unwrap()).unwrap();
        let config = Config::for_modules(dir.join("gs.wasm"), dir.join("pdfcpu.wasm"));
        WasiRuntime::new(&config).unwrap()
    }

    #[test]
    fn test_proc_exit_code_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime_with(dir.path(), EXIT_THREE, PRINTS_PROGRESS);
        let vfs = VirtualFs::new();

        let request = ExecutionRequest::new("gs", ["input.pdf"]);
        let result = runtime
            .execute_blocking(ModuleRef::Ghostscript, &request, &vfs)
            .unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(!result.is_success());
    }

    #[test]
    fn test_stdout_is_captured_and_files_survive() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime_with(dir.path(), EXIT_THREE, PRINTS_PROGRESS);
        let vfs = VirtualFs::new();
        vfs.stage("/input.pdf", b"%PDF-1.4".to_vec()).unwrap();

        let request = ExecutionRequest::new("pdfcpu", ["validate", "/input.pdf"]);
        let result = runtime
            .execute_blocking(ModuleRef::Pdfcpu, &request, &vfs)
            .unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, vec!["Generating output(3/10)"]);
        assert!(result.stderr.is_empty());
        assert_eq!(vfs.read("/input.pdf").unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_module_compiled_once_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime_with(dir.path(), EXIT_THREE, PRINTS_PROGRESS);
        let vfs = VirtualFs::new();
        let request = ExecutionRequest::new("gs", Vec::<String>::new());

        runtime
            .execute_blocking(ModuleRef::Ghostscript, &request, &vfs)
            .unwrap();
        fs::remove_file(dir.path().join("gs.wasm")).unwrap();
        let second = runtime
            .execute_blocking(ModuleRef::Ghostscript, &request, &vfs)
            .unwrap();

        assert_eq!(second.exit_code, 3);
        assert_eq!(runtime.cache().cached_count(), 1);
    }

    #[test]
    fn test_trap_is_an_error_and_leaves_tree_alone() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime_with(dir.path(), TRAPS, PRINTS_PROGRESS);
        let vfs = VirtualFs::new();
        vfs.stage("/input.pdf", b"data".to_vec()).unwrap();

        let request = ExecutionRequest::new("gs", ["input.pdf"]);
        let err = runtime
            .execute_blocking(ModuleRef::Ghostscript, &request, &vfs)
            .unwrap_err();

        assert!(err.is_trap());
        assert_eq!(vfs.read("/input.pdf").unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_async_execute_runs_off_thread() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = runtime_with(dir.path(), EXIT_THREE, PRINTS_PROGRESS);
        let vfs = VirtualFs::new();

        let request = ExecutionRequest::new("gs", ["input.pdf"]);
        let result = runtime
            .execute(ModuleRef::Ghostscript, &request, &vfs)
            .await
            .unwrap();
        assert_eq!(result.exit_code, 3);

        runtime.shutdown();
        assert_eq!(runtime.cache().cached_count(), 0);
    }

    #[test]
    fn test_missing_module_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_modules(dir.path().join("gs.wasm"), dir.path().join("nope.wasm"));
        let runtime = WasiRuntime::new(&config).unwrap();

        let request = ExecutionRequest::new("pdfcpu", ["validate"]);
        let err = runtime
            .execute_blocking(ModuleRef::Pdfcpu, &request, &VirtualFs::new())
            .unwrap_err();
        assert!(err.is_load_failure());
    }
}
