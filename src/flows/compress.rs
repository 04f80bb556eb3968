// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::report_failure;
use super::validate::stage_and_validate;
use crate::context::ToolboxContext;
use crate::errors::ToolboxResult;
use crate::observability::messages::flow::{FlowCompleted, FlowStarted};
use crate::observability::messages::StructuredLog;
use crate::packaging::{derive_output_name, Artifact};
use crate::traits::StatusReporter;
use crate::upload::UploadedFile;
use crate::worker::CompressionWorker;
use std::sync::Arc;

const FLOW: &str = "compress";

/// Validate `file`, then compress it with Ghostscript on the background
/// worker. The result is named `<stem>-compressed.pdf`.
pub async fn compress(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    reporter: Arc<dyn StatusReporter>,
) -> ToolboxResult<Artifact> {
    let _operation = ctx.begin_operation().await;
    let mut dispatcher = ctx.dispatcher(Arc::clone(&reporter));

    FlowStarted {
        flow: FLOW,
        file: &file.name,
        size_bytes: file.size(),
    }
    .log();

    let outcome: ToolboxResult<Artifact> = async {
        let staged = stage_and_validate(ctx, file, &mut dispatcher).await?;
        // The worker stages its own copy.
        ctx.discard(&staged);

        let worker = CompressionWorker::new(ctx.executor(), ctx.status_interval());
        let bytes = worker
            .run_in_background(file.bytes.clone(), Arc::clone(&reporter))
            .await?;
        Ok(Artifact::pdf(derive_output_name(&file.name, "compressed"), bytes))
    }
    .await;

    match outcome {
        Ok(artifact) => {
            tracing::info!(
                "{}",
                FlowCompleted {
                    flow: FLOW,
                    file: &file.name,
                    artifact: &artifact.file_name,
                    size_bytes: artifact.len(),
                }
            );
            dispatcher.status("Compression completed successfully.");
            Ok(artifact)
        }
        Err(error) => Err(report_failure(&mut dispatcher, FLOW, &file.name, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{RecordingReporter, ScriptedExecutor};
    use crate::backends::wasm::{ExecutionResult, ModuleRef};
    use crate::errors::ToolboxError;
    use std::time::Duration;

    fn context(executor: ScriptedExecutor) -> (ToolboxContext, Arc<ScriptedExecutor>) {
        let executor = Arc::new(executor);
        (ToolboxContext::new(executor.clone(), Duration::ZERO), executor)
    }

    #[tokio::test]
    async fn test_compressed_artifact_is_named_after_input() {
        let (ctx, executor) = context(ScriptedExecutor::new(|module, _, vfs| {
            if module == ModuleRef::Ghostscript {
                vfs.stage("output.pdf", b"small".to_vec()).unwrap();
            }
            Ok(ExecutionResult::new(0))
        }));
        let reporter = Arc::new(RecordingReporter::default());

        let artifact = compress(&ctx, &UploadedFile::new("report.pdf", b"big".to_vec()), reporter.clone())
            .await
            .unwrap();

        assert_eq!(artifact.file_name, "report-compressed.pdf");
        assert_eq!(artifact.bytes, b"small");
        let modules: Vec<ModuleRef> = executor.calls().into_iter().map(|(m, _)| m).collect();
        assert_eq!(modules, vec![ModuleRef::Pdfcpu, ModuleRef::Ghostscript]);
        assert_eq!(ctx.vfs().file_count(), 0);
        assert_eq!(
            reporter.statuses().last().unwrap(),
            "Compression completed successfully."
        );
    }

    #[tokio::test]
    async fn test_failed_validation_never_reaches_ghostscript() {
        let (ctx, executor) = context(ScriptedExecutor::new(|_, _, _| Ok(ExecutionResult::new(2))));

        let err = compress(
            &ctx,
            &UploadedFile::new("broken.pdf", b"junk".to_vec()),
            Arc::new(RecordingReporter::default()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolboxError::ValidationFailed { .. }));
        assert_eq!(executor.calls().len(), 1);
        assert_eq!(executor.subcommands(), vec!["validate"]);
    }

    #[tokio::test]
    async fn test_worker_failure_becomes_status() {
        let (ctx, _) = context(ScriptedExecutor::new(|module, _, _| match module {
            ModuleRef::Pdfcpu => Ok(ExecutionResult::new(0)),
            ModuleRef::Ghostscript => Ok(ExecutionResult::new(1)),
        }));
        let reporter = Arc::new(RecordingReporter::default());

        let err = compress(&ctx, &UploadedFile::new("a.pdf", b"x".to_vec()), reporter.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, ToolboxError::Worker(_)));
        assert_eq!(
            reporter.statuses().last().unwrap(),
            "Compression failed: Ghostscript exited with code 1"
        );
    }
}
