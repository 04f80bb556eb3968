// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::message::{decode_data_url, encode_data_url, WorkerMessage};
use crate::backends::wasm::ModuleRef;
use crate::commands::{ghostscript_compress, GS_INPUT, GS_OUTPUT};
use crate::errors::{ToolboxError, ToolboxResult};
use crate::observability::messages::worker::{WorkerFinished, WorkerSpawned, WorkerVanished};
use crate::observability::messages::ErrorChain;
use crate::progress::{parse_status, StatusDispatcher};
use crate::traits::{ModuleExecutor, StatusReporter};
use crate::vfs::VirtualFs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs Ghostscript compression on a background task.
///
/// The task owns a private [`VirtualFs`]; only the executor (and with it the
/// compiled module cache) is shared with the caller.
pub struct CompressionWorker {
    executor: Arc<dyn ModuleExecutor>,
    status_interval: Duration,
}

impl CompressionWorker {
    pub fn new(executor: Arc<dyn ModuleExecutor>, status_interval: Duration) -> Self {
        Self {
            executor,
            status_interval,
        }
    }

    /// Start the worker and hand back its message stream.
    pub fn spawn(
        &self,
        input: Vec<u8>,
    ) -> (mpsc::UnboundedReceiver<WorkerMessage>, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let executor = Arc::clone(&self.executor);
        tracing::debug!("{}", WorkerSpawned { input_size: input.len() });

        let handle = tokio::spawn(async move {
            let terminal = compress(executor.as_ref(), input, &sender).await;
            // A dropped receiver has nobody left to tell.
            let _ = sender.send(terminal);
        });

        (receiver, handle)
    }

    /// Compress `input` in the background and wait for the result.
    ///
    /// Status and progress are forwarded to `reporter` as they arrive. The
    /// call resolves on the first terminal message; a worker that goes away
    /// without one is an error.
    pub async fn run_in_background(
        &self,
        input: Vec<u8>,
        reporter: Arc<dyn StatusReporter>,
    ) -> ToolboxResult<Vec<u8>> {
        let (mut receiver, handle) = self.spawn(input);
        let mut dispatcher = StatusDispatcher::new(reporter, self.status_interval);

        let outcome = loop {
            match receiver.recv().await {
                Some(WorkerMessage::Status { text }) => dispatcher.status(&text),
                Some(WorkerMessage::Progress { event }) => {
                    dispatcher.progress(event);
                }
                Some(WorkerMessage::Completed { pdf_data_url }) => {
                    tracing::debug!("{}", WorkerFinished { succeeded: true });
                    dispatcher.finish();
                    break decode_data_url(&pdf_data_url);
                }
                Some(WorkerMessage::Failed { error }) => {
                    tracing::debug!("{}", WorkerFinished { succeeded: false });
                    break Err(ToolboxError::Worker(error));
                }
                None => {
                    tracing::error!("{}", WorkerVanished);
                    break Err(ToolboxError::Worker(WorkerVanished.to_string()));
                }
            }
        };

        // The worker ends right after its terminal message; a panic after that
        // point does not change the outcome.
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Compression worker task did not exit cleanly");
        }

        outcome
    }
}

/// The worker body. Returns the terminal message; everything else is sent
/// along the way.
async fn compress(
    executor: &dyn ModuleExecutor,
    input: Vec<u8>,
    sender: &mpsc::UnboundedSender<WorkerMessage>,
) -> WorkerMessage {
    let vfs = VirtualFs::new();
    if let Err(e) = vfs.stage(GS_INPUT, input) {
        return WorkerMessage::Failed {
            error: ErrorChain(&e).to_string(),
        };
    }

    let request = ghostscript_compress();
    let result = match executor.execute(ModuleRef::Ghostscript, &request, &vfs).await {
        Ok(result) => result,
        Err(e) => {
            return WorkerMessage::Failed {
                error: ErrorChain(&e).to_string(),
            }
        }
    };

    for line in result.status_lines() {
        let parsed = parse_status(&line);
        if let Some(event) = parsed.progress {
            let _ = sender.send(WorkerMessage::Progress { event });
        }
        let _ = sender.send(WorkerMessage::Status { text: parsed.text });
    }

    if !result.is_success() {
        return WorkerMessage::Failed {
            error: format!("Ghostscript exited with code {}", result.exit_code),
        };
    }

    match vfs.read(GS_OUTPUT) {
        Ok(bytes) => WorkerMessage::Completed {
            pdf_data_url: encode_data_url(&bytes),
        },
        Err(e) => WorkerMessage::Failed {
            error: format!("Failed to read {}: {}", GS_OUTPUT, e),
        },
    }
}
