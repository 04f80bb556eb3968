// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::{ExecutionRequest, ExecutionResult, ModuleRef, WasmResult};
use crate::progress::ProgressEvent;
use crate::traits::{ModuleExecutor, StatusReporter};
use crate::vfs::VirtualFs;
use std::sync::Mutex;

type Script =
    Box<dyn Fn(ModuleRef, &ExecutionRequest, &VirtualFs) -> WasmResult<ExecutionResult> + Send + Sync>;

/// An executor that answers every request with a closure and remembers argv.
///
/// The closure sees the live virtual filesystem, so it can play the part of
/// a binary that writes its output file.
pub struct ScriptedExecutor {
    script: Script,
    calls: Mutex<Vec<(ModuleRef, Vec<String>)>>,
}

impl ScriptedExecutor {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(ModuleRef, &ExecutionRequest, &VirtualFs) -> WasmResult<ExecutionResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Exits 0 without touching the filesystem.
    pub fn succeeding() -> Self {
        Self::new(|_, _, _| Ok(ExecutionResult::new(0)))
    }

    pub fn calls(&self) -> Vec<(ModuleRef, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// The pdfcpu subcommands seen so far, in order.
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(module, _)| *module == ModuleRef::Pdfcpu)
            .filter_map(|(_, argv)| argv.get(1).cloned())
            .collect()
    }
}

#[async_trait::async_trait]
impl ModuleExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        module: ModuleRef,
        request: &ExecutionRequest,
        vfs: &VirtualFs,
    ) -> WasmResult<ExecutionResult> {
        self.calls
            .lock()
            .unwrap()
            .push((module, request.argv().to_vec()));
        (self.script)(module, request, vfs)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reported {
    Status(String),
    Progress(ProgressEvent),
}

/// Keeps everything it is told, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Reported>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Reported> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Status(text) => Some(text),
                Reported::Progress(_) => None,
            })
            .collect()
    }

    pub fn progress_events(&self) -> Vec<ProgressEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Reported::Progress(progress) => Some(progress),
                Reported::Status(_) => None,
            })
            .collect()
    }
}

impl StatusReporter for RecordingReporter {
    fn status(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Reported::Status(text.to_string()));
    }

    fn progress(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(Reported::Progress(event));
    }
}
