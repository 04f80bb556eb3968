// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::parser::{parse_status, ProgressEvent};
use crate::traits::StatusReporter;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Feeds raw status lines to a reporter.
///
/// A status identical to the previous one is not repeated, and progress
/// updates closer than `interval` to the last forwarded one are dropped.
/// [`finish`](Self::finish) always goes through.
pub struct StatusDispatcher {
    reporter: Arc<dyn StatusReporter>,
    interval: Duration,
    last_status: Option<String>,
    last_progress_at: Option<Instant>,
}

impl StatusDispatcher {
    pub fn new(reporter: Arc<dyn StatusReporter>, interval: Duration) -> Self {
        Self {
            reporter,
            interval,
            last_status: None,
            last_progress_at: None,
        }
    }

    pub fn dispatch(&mut self, raw: &str) {
        self.dispatch_at(raw, Instant::now());
    }

    pub fn dispatch_at(&mut self, raw: &str, now: Instant) {
        let parsed = parse_status(raw);

        if let Some(event) = parsed.progress {
            if !self.progress_at(event, now) {
                return;
            }
        }

        self.status(&parsed.text);
    }

    pub fn progress(&mut self, event: ProgressEvent) -> bool {
        self.progress_at(event, Instant::now())
    }

    /// Forward `event` unless the previous one went out less than `interval`
    /// ago. Returns whether it was forwarded.
    pub fn progress_at(&mut self, event: ProgressEvent, now: Instant) -> bool {
        let throttled = self
            .last_progress_at
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval);
        if throttled {
            return false;
        }
        self.last_progress_at = Some(now);
        self.reporter.progress(event);
        true
    }

    /// Report a status that is not a module output line.
    pub fn status(&mut self, text: &str) {
        if self.last_status.as_deref() == Some(text) {
            return;
        }
        self.reporter.status(text);
        self.last_status = Some(text.to_string());
    }

    pub fn finish(&mut self) {
        self.reporter.progress(ProgressEvent::done());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{RecordingReporter, Reported};

    fn dispatcher(interval_ms: u64) -> (StatusDispatcher, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::default());
        let dispatcher = StatusDispatcher::new(reporter.clone(), Duration::from_millis(interval_ms));
        (dispatcher, reporter)
    }

    #[test]
    fn test_repeated_status_is_suppressed() {
        let (mut dispatcher, reporter) = dispatcher(30);
        dispatcher.dispatch("Loading fonts");
        dispatcher.dispatch("Loading fonts");
        dispatcher.dispatch("Writing output");

        assert_eq!(reporter.statuses(), vec!["Loading fonts", "Writing output"]);
    }

    #[test]
    fn test_progress_inside_interval_is_dropped() {
        let (mut dispatcher, reporter) = dispatcher(30);
        let start = Instant::now();

        dispatcher.dispatch_at("Page(1/4)", start);
        dispatcher.dispatch_at("Page(2/4)", start + Duration::from_millis(10));
        dispatcher.dispatch_at("Page(3/4)", start + Duration::from_millis(45));

        let percents: Vec<f64> = reporter.progress_events().iter().map(|e| e.percent()).collect();
        assert_eq!(percents, vec![25.0, 75.0]);
        // The dropped update also leaves the status alone.
        assert_eq!(reporter.statuses(), vec!["Page"]);
    }

    #[test]
    fn test_finish_is_never_throttled() {
        let (mut dispatcher, reporter) = dispatcher(1_000);
        dispatcher.dispatch("Page(1/2)");
        dispatcher.finish();

        let events = reporter.progress_events();
        assert_eq!(events.len(), 2);
        assert!(events[1].finished);
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (mut dispatcher, reporter) = dispatcher(0);
        dispatcher.status("Validating input.pdf");
        dispatcher.dispatch("Page(1/2)");

        assert_eq!(
            reporter.events(),
            vec![
                Reported::Status("Validating input.pdf".to_string()),
                Reported::Progress(ProgressEvent::new(false, 50.0, 100.0)),
                Reported::Status("Page".to_string()),
            ]
        );
    }
}
