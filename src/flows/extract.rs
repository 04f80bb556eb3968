// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::report_failure;
use super::validate::stage_and_validate;
use crate::backends::wasm::ModuleRef;
use crate::commands::{pdfcpu_extract, ExtractMode};
use crate::context::ToolboxContext;
use crate::errors::{ToolboxError, ToolboxResult};
use crate::observability::messages::flow::{FlowCompleted, FlowStarted};
use crate::observability::messages::StructuredLog;
use crate::packaging::{package_directory, Artifact};
use crate::progress::StatusDispatcher;
use crate::traits::StatusReporter;
use crate::upload::UploadedFile;
use std::sync::Arc;

const FLOW: &str = "extract";

/// Output directory handed to pdfcpu, relative to the guest root.
pub const EXTRACT_DIR: &str = "./extracted";

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedData {
    /// Parsed `meta.json`.
    Metadata(serde_json::Value),
    /// Text of `content.txt`.
    Content(String),
}

/// What an extraction produced: the data read back, plus the whole output
/// directory as a zip named after the mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub mode: ExtractMode,
    pub data: ExtractedData,
    pub archive: Artifact,
}

/// Extract metadata (`meta`) or text content (`content`) from `file`.
///
/// Any other mode is rejected before anything is staged.
pub async fn extract(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    mode: &str,
    reporter: Arc<dyn StatusReporter>,
) -> ToolboxResult<Extraction> {
    let mut dispatcher = ctx.dispatcher(reporter);
    let mode: ExtractMode = match mode.parse() {
        Ok(mode) => mode,
        Err(error) => return Err(report_failure(&mut dispatcher, FLOW, &file.name, error)),
    };

    let _operation = ctx.begin_operation().await;
    FlowStarted {
        flow: FLOW,
        file: &file.name,
        size_bytes: file.size(),
    }
    .log();
    dispatcher.status(&format!("Extracting {} from {}...", mode, file.name));

    match extract_one(ctx, file, mode, &mut dispatcher).await {
        Ok(extraction) => {
            tracing::info!(
                "{}",
                FlowCompleted {
                    flow: FLOW,
                    file: &file.name,
                    artifact: &extraction.archive.file_name,
                    size_bytes: extraction.archive.len(),
                }
            );
            dispatcher.status(&format!("Extracted {} from {}", mode, file.name));
            Ok(extraction)
        }
        Err(error) => Err(report_failure(&mut dispatcher, FLOW, &file.name, error)),
    }
}

async fn extract_one(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    mode: ExtractMode,
    dispatcher: &mut StatusDispatcher,
) -> ToolboxResult<Extraction> {
    let input = stage_and_validate(ctx, file, dispatcher).await?;

    let outcome: ToolboxResult<Extraction> = async {
        // Leftovers from an earlier run would end up in the archive.
        ctx.discard_dir(EXTRACT_DIR);
        ctx.vfs()
            .create_dir(EXTRACT_DIR)
            .map_err(|source| ToolboxError::Staging {
                path: EXTRACT_DIR.to_string(),
                source,
            })?;

        let operation = format!("extract {} from", mode);
        let result = ctx
            .run(
                ModuleRef::Pdfcpu,
                &pdfcpu_extract(mode, &input, EXTRACT_DIR),
                &operation,
                &file.name,
                dispatcher,
            )
            .await?;
        if !result.is_success() {
            return Err(ToolboxError::Execution {
                operation,
                file: file.name.clone(),
                exit_code: result.exit_code,
            });
        }

        let output = format!("{}/{}", EXTRACT_DIR, mode.output_file());
        let raw = ctx
            .vfs()
            .read(&output)
            .map_err(|source| ToolboxError::ReadBack {
                path: output.clone(),
                source,
            })?;
        let data = match mode {
            ExtractMode::Metadata => ExtractedData::Metadata(serde_json::from_slice(&raw)?),
            ExtractMode::Content => ExtractedData::Content(String::from_utf8_lossy(&raw).into_owned()),
        };

        let archive = package_directory(ctx.vfs(), EXTRACT_DIR, mode.as_str())?;
        Ok(Extraction {
            mode,
            data,
            archive,
        })
    }
    .await;

    ctx.discard(&input);
    if outcome.is_err() {
        ctx.discard_dir(EXTRACT_DIR);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{RecordingReporter, ScriptedExecutor};
    use crate::backends::wasm::ExecutionResult;
    use std::io::Cursor;
    use std::time::Duration;

    fn context(executor: ScriptedExecutor) -> (ToolboxContext, Arc<ScriptedExecutor>) {
        let executor = Arc::new(executor);
        (ToolboxContext::new(executor.clone(), Duration::ZERO), executor)
    }

    /// Validates everything; `extract` writes `contents` under the output
    /// directory it was given.
    fn writes(file: &'static str, contents: &'static [u8]) -> ScriptedExecutor {
        ScriptedExecutor::new(move |_, request, vfs| {
            if request.subcommand() == Some("extract") {
                let out_dir = request.args().last().unwrap();
                vfs.stage(&format!("{}/{}", out_dir, file), contents.to_vec())
                    .unwrap();
            }
            Ok(ExecutionResult::new(0))
        })
    }

    #[tokio::test]
    async fn test_metadata_is_parsed_and_zipped() {
        let (ctx, executor) = context(writes("meta.json", br#"{"Title":"Report"}"#));
        let upload = UploadedFile::new("report.pdf", b"%PDF".to_vec());

        let extraction = extract(&ctx, &upload, "meta", Arc::new(RecordingReporter::default()))
            .await
            .unwrap();

        assert_eq!(
            extraction.data,
            ExtractedData::Metadata(serde_json::json!({"Title": "Report"}))
        );
        assert_eq!(extraction.archive.file_name, "meta.zip");
        let archive = zip::ZipArchive::new(Cursor::new(extraction.archive.bytes)).unwrap();
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["meta.json"]);

        assert_eq!(
            executor.calls()[1].1,
            vec!["pdfcpu", "extract", "-m", "meta", "-c", "disable", "/report.pdf", "./extracted"]
        );
        assert!(!ctx.vfs().exists(EXTRACT_DIR));
        assert_eq!(ctx.vfs().file_count(), 0);
    }

    #[tokio::test]
    async fn test_content_is_read_as_text() {
        let (ctx, _) = context(writes("content.txt", b"Hello, world"));
        let upload = UploadedFile::new("report.pdf", b"%PDF".to_vec());

        let extraction = extract(&ctx, &upload, "content", Arc::new(RecordingReporter::default()))
            .await
            .unwrap();

        assert_eq!(extraction.data, ExtractedData::Content("Hello, world".into()));
        assert_eq!(extraction.archive.file_name, "content.zip");
    }

    #[tokio::test]
    async fn test_unsupported_mode_does_no_work() {
        let (ctx, executor) = context(ScriptedExecutor::succeeding());
        let reporter = Arc::new(RecordingReporter::default());

        let err = extract(
            &ctx,
            &UploadedFile::new("a.pdf", b"x".to_vec()),
            "images",
            reporter.clone(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolboxError::UnsupportedMode(ref m) if m == "images"));
        assert!(executor.calls().is_empty());
        assert_eq!(ctx.vfs().file_count(), 0);
        assert_eq!(
            reporter.statuses(),
            vec!["Extraction mode 'images' not supported yet."]
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_skips_read_back() {
        let (ctx, _) = context(ScriptedExecutor::new(|_, request, vfs| {
            if request.subcommand() == Some("extract") {
                vfs.stage("/extracted/meta.json", b"{}".to_vec()).unwrap();
                return Ok(ExecutionResult::new(1));
            }
            Ok(ExecutionResult::new(0))
        }));
        let reporter = Arc::new(RecordingReporter::default());

        let err = extract(&ctx, &UploadedFile::new("a.pdf", b"x".to_vec()), "meta", reporter.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, ToolboxError::Execution { exit_code: 1, .. }));
        assert_eq!(
            reporter.statuses().last().unwrap(),
            "Failed to extract meta from a.pdf"
        );
        assert!(!ctx.vfs().exists(EXTRACT_DIR));
        assert_eq!(ctx.vfs().file_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_metadata_is_an_error() {
        let (ctx, _) = context(writes("meta.json", b"not json"));

        let err = extract(
            &ctx,
            &UploadedFile::new("a.pdf", b"x".to_vec()),
            "meta",
            Arc::new(RecordingReporter::default()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolboxError::InvalidMetadata(_)));
        assert!(!ctx.vfs().exists(EXTRACT_DIR));
    }

    #[tokio::test]
    async fn test_missing_output_file_is_read_back_error() {
        let (ctx, _) = context(writes("other.txt", b"x"));

        let err = extract(
            &ctx,
            &UploadedFile::new("a.pdf", b"x".to_vec()),
            "content",
            Arc::new(RecordingReporter::default()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolboxError::ReadBack { ref path, .. } if path == "./extracted/content.txt"));
    }

    #[tokio::test]
    async fn test_invalid_file_never_reaches_extract() {
        let (ctx, executor) = context(ScriptedExecutor::new(|_, request, _| {
            match request.subcommand() {
                Some("validate") => Ok(ExecutionResult::new(1)),
                _ => Ok(ExecutionResult::new(0)),
            }
        }));
        let reporter = Arc::new(RecordingReporter::default());

        let err = extract(&ctx, &UploadedFile::new("bad.pdf", b"junk".to_vec()), "meta", reporter.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, ToolboxError::ValidationFailed { exit_code: 1, .. }));
        assert_eq!(executor.subcommands(), vec!["validate"]);
        assert_eq!(reporter.statuses().last().unwrap(), "Validation failed for bad.pdf");
        assert!(!ctx.vfs().exists(EXTRACT_DIR));
        assert_eq!(ctx.vfs().file_count(), 0);
    }
}
