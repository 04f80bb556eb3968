// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::report_failure;
use super::validate::stage_and_validate;
use crate::backends::wasm::ModuleRef;
use crate::commands::pdfcpu_grayscale;
use crate::context::ToolboxContext;
use crate::errors::{ToolboxError, ToolboxResult};
use crate::observability::messages::flow::{BatchCompleted, FlowCompleted, FlowStarted};
use crate::observability::messages::StructuredLog;
use crate::packaging::{derive_output_name, package_single, Artifact, PackagingError};
use crate::progress::StatusDispatcher;
use crate::traits::StatusReporter;
use crate::upload::UploadedFile;
use std::sync::Arc;
use tracing::Instrument;

const FLOW: &str = "grayscale";
const OPERATION: &str = "convert";

/// How one file of a batch went.
#[derive(Debug)]
pub struct FileOutcome {
    pub file: String,
    pub result: ToolboxResult<Artifact>,
}

/// Per-file results of a grayscale batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// The final status line shown to the user.
    pub last_status: String,
}

impl BatchReport {
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ToolboxError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file.as_str(), e)))
    }

    pub fn succeeded(&self) -> usize {
        self.artifacts().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

/// Convert each file to grayscale, one after another.
///
/// Inputs arrive as read results so an unreadable file fails on its own:
/// a failing file is reported and skipped, and the rest of the batch still
/// runs.
pub async fn grayscale_batch(
    ctx: &ToolboxContext,
    files: Vec<ToolboxResult<UploadedFile>>,
    reporter: Arc<dyn StatusReporter>,
) -> BatchReport {
    let _operation = ctx.begin_operation().await;
    let mut dispatcher = ctx.dispatcher(reporter);
    dispatcher.status("Starting conversion...");

    let mut outcomes = Vec::with_capacity(files.len());
    for input in files {
        let file = match input {
            Ok(file) => file,
            Err(error) => {
                let name = match &error {
                    ToolboxError::FileRead { path, .. } => UploadedFile::name_for(path),
                    _ => UploadedFile::UNNAMED.to_string(),
                };
                dispatcher.status(&format!("Processing {}...", name));
                outcomes.push(FileOutcome {
                    result: Err(report_failure(&mut dispatcher, FLOW, &name, error)),
                    file: name,
                });
                continue;
            }
        };

        let started = FlowStarted {
            flow: FLOW,
            file: &file.name,
            size_bytes: file.size(),
        };
        started.log();
        let span = started.span("convert_one");
        dispatcher.status(&format!("Processing {}...", file.name));

        let result = match convert_one(ctx, &file, &mut dispatcher).instrument(span).await {
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
                dispatcher.status(&format!("Successfully converted {}", file.name));
                Ok(artifact)
            }
            Err(error) => Err(report_failure(&mut dispatcher, FLOW, &file.name, error)),
        };

        outcomes.push(FileOutcome {
            file: file.name,
            result,
        });
    }

    let last_status = "Conversion completed.".to_string();
    dispatcher.status(&last_status);

    let report = BatchReport {
        outcomes,
        last_status,
    };
    BatchCompleted {
        flow: FLOW,
        succeeded: report.succeeded(),
        failed: report.failed(),
    }
    .log();
    report
}

async fn convert_one(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    dispatcher: &mut StatusDispatcher,
) -> ToolboxResult<Artifact> {
    let input = stage_and_validate(ctx, file, dispatcher).await?;
    let output_name = derive_output_name(&file.name, FLOW);
    let output = format!("/{}", output_name);

    let outcome: ToolboxResult<Artifact> = async {
        let result = ctx
            .run(
                ModuleRef::Pdfcpu,
                &pdfcpu_grayscale(&input, &output),
                OPERATION,
                &file.name,
                dispatcher,
            )
            .await?;
        if !result.is_success() {
            return Err(ToolboxError::Execution {
                operation: OPERATION.to_string(),
                file: file.name.clone(),
                exit_code: result.exit_code,
            });
        }
        package_single(ctx.vfs(), &output, &output_name).map_err(|error| match error {
            PackagingError::Vfs(source) => ToolboxError::ReadBack {
                path: output.clone(),
                source,
            },
            other => other.into(),
        })
    }
    .await;

    ctx.discard(&input);
    ctx.discard(&output);
    outcome
}
