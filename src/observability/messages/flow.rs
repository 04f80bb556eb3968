// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the compress, grayscale, extract and validate flows.

use crate::observability::messages::{ErrorChain, StructuredLog};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A flow started working on one file.
///
/// # Log Level
/// `info!`
///
/// # Example
/// ```
/// use pdfwasm::observability::messages::flow::FlowStarted;
/// use pdfwasm::observability::messages::StructuredLog;
///
/// FlowStarted { flow: "grayscale", file: "report.pdf", size_bytes: 2048 }.log();
/// ```
pub struct FlowStarted<'a> {
    pub flow: &'a str,
    pub file: &'a str,
    pub size_bytes: usize,
}

impl Display for FlowStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} of '{}' ({} bytes)",
            self.flow, self.file, self.size_bytes
        )
    }
}

impl StructuredLog for FlowStarted<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            file = self.file,
            size_bytes = self.size_bytes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "flow",
            span_name = name,
            flow = self.flow,
            file = self.file,
        )
    }
}

/// A flow produced its result for one file.
///
/// # Log Level
/// `info!`
pub struct FlowCompleted<'a> {
    pub flow: &'a str,
    pub file: &'a str,
    pub artifact: &'a str,
    pub size_bytes: usize,
}

impl Display for FlowCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finished {} of '{}': produced {} ({} bytes)",
            self.flow, self.file, self.artifact, self.size_bytes
        )
    }
}

/// A flow failed for one file.
///
/// # Log Level
/// `error!`
pub struct FlowFailed<'a> {
    pub flow: &'a str,
    pub file: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for FlowFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} of '{}' failed: {}", self.flow, self.file, ErrorChain(self.error))
    }
}

/// A batch finished; counts both outcomes.
///
/// # Log Level
/// `info!`
pub struct BatchCompleted<'a> {
    pub flow: &'a str,
    pub succeeded: usize,
    pub failed: usize,
}

impl Display for BatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} batch completed: {} succeeded, {} failed",
            self.flow, self.succeeded, self.failed
        )
    }
}

impl StructuredLog for BatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            succeeded = self.succeeded,
            failed = self.failed,
            "{}", self
        );
    }
}
