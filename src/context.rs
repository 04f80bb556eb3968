// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared state for every flow.
//!
//! A [`ToolboxContext`] owns the virtual filesystem and the module executor
//! (and through it the compiled module cache). Flows take the context by
//! reference and hold its operation lock from staging to cleanup, so two
//! flows on the same context run one after the other.

use crate::backends::wasm::{ExecutionRequest, ExecutionResult, ModuleRef, WasiRuntime};
use crate::config::Config;
use crate::errors::{ToolboxError, ToolboxResult};
use crate::observability::messages::vfs::CleanupSkipped;
use crate::progress::StatusDispatcher;
use crate::traits::{ModuleExecutor, StatusReporter};
use crate::vfs::VirtualFs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

pub struct ToolboxContext {
    vfs: VirtualFs,
    executor: Arc<dyn ModuleExecutor>,
    operation_lock: Mutex<()>,
    status_interval: Duration,
}

impl ToolboxContext {
    pub fn new(executor: Arc<dyn ModuleExecutor>, status_interval: Duration) -> Self {
        Self {
            vfs: VirtualFs::new(),
            executor,
            operation_lock: Mutex::new(()),
            status_interval,
        }
    }

    /// Build a context around a wasmtime runtime for the configured modules.
    ///
    /// Modules are compiled lazily on first use.
    pub fn from_config(config: &Config) -> ToolboxResult<Self> {
        let runtime = WasiRuntime::new(config).map_err(ToolboxError::Runtime)?;
        Ok(Self::new(
            Arc::new(runtime),
            config.status.progress_interval(),
        ))
    }

    pub fn vfs(&self) -> &VirtualFs {
        &self.vfs
    }

    pub fn executor(&self) -> Arc<dyn ModuleExecutor> {
        Arc::clone(&self.executor)
    }

    pub fn status_interval(&self) -> Duration {
        self.status_interval
    }

    /// Wait for any running flow to finish, then claim the context.
    pub async fn begin_operation(&self) -> MutexGuard<'_, ()> {
        self.operation_lock.lock().await
    }

    pub fn dispatcher(&self, reporter: Arc<dyn StatusReporter>) -> StatusDispatcher {
        StatusDispatcher::new(reporter, self.status_interval)
    }

    /// Run a module against the shared filesystem and replay its output as
    /// status lines. A non-zero exit code is returned, not raised.
    pub(crate) async fn run(
        &self,
        module: ModuleRef,
        request: &ExecutionRequest,
        operation: &str,
        file: &str,
        dispatcher: &mut StatusDispatcher,
    ) -> ToolboxResult<ExecutionResult> {
        let result = self
            .executor
            .execute(module, request, &self.vfs)
            .await
            .map_err(|e| ToolboxError::from_wasm(module, operation, file, e))?;

        for line in result.status_lines() {
            dispatcher.dispatch(&line);
        }
        Ok(result)
    }

    /// Best-effort removal of a file. A missing file is not worth more than
    /// a debug line.
    pub(crate) fn discard(&self, path: &str) {
        if let Err(error) = self.vfs.remove(path) {
            tracing::debug!("{}", CleanupSkipped { path, error: &error });
        }
    }

    /// Best-effort removal of a directory tree.
    pub(crate) fn discard_dir(&self, path: &str) {
        if let Err(error) = self.vfs.remove_dir_all(path) {
            tracing::debug!("{}", CleanupSkipped { path, error: &error });
        }
    }

    /// Drop every staged file and compiled module.
    pub fn shutdown(&self) {
        self.vfs.clear();
        self.executor.shutdown();
        tracing::info!(executor = self.executor.name(), "Toolbox context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::ScriptedExecutor;
    use std::time::Instant;

    #[tokio::test]
    async fn test_operations_are_serialized() {
        let context = Arc::new(ToolboxContext::new(
            Arc::new(ScriptedExecutor::succeeding()),
            Duration::ZERO,
        ));

        let guard = context.begin_operation().await;
        let waiter = {
            let context = Arc::clone(&context);
            tokio::spawn(async move {
                let started = Instant::now();
                let _guard = context.begin_operation().await;
                started.elapsed()
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);

        let waited = waiter.await.unwrap();
        assert!(waited >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_shutdown_clears_files() {
        let context = ToolboxContext::new(Arc::new(ScriptedExecutor::succeeding()), Duration::ZERO);
        context.vfs().stage("/input.pdf", b"x".to_vec()).unwrap();

        context.shutdown();

        assert_eq!(context.vfs().file_count(), 0);
    }

    #[test]
    fn test_discard_tolerates_missing_paths() {
        let context = ToolboxContext::new(Arc::new(ScriptedExecutor::succeeding()), Duration::ZERO);
        context.vfs().stage("/a.pdf", b"x".to_vec()).unwrap();

        context.discard("/a.pdf");
        context.discard("/a.pdf");
        context.discard_dir("/extracted");

        assert!(!context.vfs().exists("/a.pdf"));
    }
}
