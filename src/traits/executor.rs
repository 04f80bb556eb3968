// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::wasm::{ExecutionRequest, ExecutionResult, ModuleRef, WasmResult};
use crate::vfs::VirtualFs;

/// Runs one module invocation against a virtual filesystem.
///
/// Implementations see the files staged in `vfs` at run time and leave the
/// module's outputs there when it returns. Calls on the same `vfs` must be
/// serialized by the caller.
#[async_trait]
pub trait ModuleExecutor: Send + Sync {
    async fn execute(
        &self,
        module: ModuleRef,
        request: &ExecutionRequest,
        vfs: &VirtualFs,
    ) -> WasmResult<ExecutionResult>;

    fn name(&self) -> &'static str;

    /// Release cached state. The default has nothing to release.
    fn shutdown(&self) {}
}
