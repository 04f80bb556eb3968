// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::report_failure;
use crate::backends::wasm::ModuleRef;
use crate::commands::pdfcpu_validate;
use crate::context::ToolboxContext;
use crate::errors::{ToolboxError, ToolboxResult};
use crate::observability::messages::flow::FlowStarted;
use crate::observability::messages::vfs::FileStaged;
use crate::observability::messages::StructuredLog;
use crate::progress::StatusDispatcher;
use crate::traits::StatusReporter;
use crate::upload::UploadedFile;
use std::sync::Arc;

const FLOW: &str = "validate";

/// Stage `file` and run `pdfcpu validate` on it.
///
/// Returns the staged path. If validation does not pass, the staged file is
/// removed again and nothing else runs.
pub(crate) async fn stage_and_validate(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    dispatcher: &mut StatusDispatcher,
) -> ToolboxResult<String> {
    let path = file.vfs_path();
    ctx.vfs()
        .stage(&path, file.bytes.clone())
        .map_err(|source| ToolboxError::Staging {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(
        "{}",
        FileStaged {
            path: &path,
            size_bytes: file.size(),
        }
    );

    let result = ctx
        .run(
            ModuleRef::Pdfcpu,
            &pdfcpu_validate(&path),
            FLOW,
            &file.name,
            dispatcher,
        )
        .await;

    match result {
        Ok(result) if result.is_success() => Ok(path),
        Ok(result) => {
            ctx.discard(&path);
            Err(ToolboxError::ValidationFailed {
                file: file.name.clone(),
                exit_code: result.exit_code,
            })
        }
        Err(error) => {
            ctx.discard(&path);
            Err(error)
        }
    }
}

/// Check that pdfcpu accepts `file`, leaving nothing staged afterwards.
pub async fn validate(
    ctx: &ToolboxContext,
    file: &UploadedFile,
    reporter: Arc<dyn StatusReporter>,
) -> ToolboxResult<()> {
    let _operation = ctx.begin_operation().await;
    let mut dispatcher = ctx.dispatcher(reporter);

    FlowStarted {
        flow: FLOW,
        file: &file.name,
        size_bytes: file.size(),
    }
    .log();
    dispatcher.status(&format!("Validating {}...", file.name));

    match stage_and_validate(ctx, file, &mut dispatcher).await {
        Ok(path) => {
            ctx.discard(&path);
            dispatcher.status(&format!("{} is a valid PDF", file.name));
            Ok(())
        }
        Err(error) => Err(report_failure(&mut dispatcher, FLOW, &file.name, error)),
    }
}
