// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::progress::ProgressEvent;

/// Receives the human-readable status and progress of a running flow.
///
/// Both callbacks may fire any number of times and in any order.
pub trait StatusReporter: Send + Sync {
    fn status(&self, text: &str);

    fn progress(&self, event: ProgressEvent);
}

/// Forwards status to `info!` and progress to `debug!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn status(&self, text: &str) {
        tracing::info!(status = text, "{}", text);
    }

    fn progress(&self, event: ProgressEvent) {
        tracing::debug!(
            finished = event.finished,
            percent = event.percent(),
            "Progress {:.2}%",
            event.percent()
        );
    }
}
