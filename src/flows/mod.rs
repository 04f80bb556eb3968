// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The user-facing operations.
//!
//! Each flow claims the [`ToolboxContext`](crate::context::ToolboxContext),
//! stages its input, validates it with pdfcpu, runs the processing module,
//! reads the output back and packages it. Failures are reported to the
//! status reporter as a user message and returned to the caller.

mod compress;
mod extract;
mod grayscale;
mod validate;

pub use compress::compress;
pub use extract::{extract, ExtractedData, Extraction, EXTRACT_DIR};
pub use grayscale::{grayscale_batch, BatchReport, FileOutcome};
pub use validate::validate;

use crate::errors::ToolboxError;
use crate::observability::messages::flow::FlowFailed;
use crate::progress::StatusDispatcher;

/// Log a failed flow, show its user message and hand the error back.
fn report_failure(
    dispatcher: &mut StatusDispatcher,
    flow: &str,
    file: &str,
    error: ToolboxError,
) -> ToolboxError {
    tracing::error!("{}", FlowFailed { flow, file, error: &error });
    dispatcher.status(&error.user_message());
    error
}
