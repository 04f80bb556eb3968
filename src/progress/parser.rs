// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `label(current/total)`, with optionally fractional numbers.
static PROGRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^(]+)\((\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)\)").expect("progress pattern is valid")
});

/// One progress update.
///
/// Updates parsed from status lines are normalized to a total of 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub finished: bool,
    pub completed: f64,
    pub total: f64,
}

impl ProgressEvent {
    pub fn new(finished: bool, completed: f64, total: f64) -> Self {
        Self {
            finished,
            completed,
            total,
        }
    }

    /// The terminal event sent once a run ends.
    pub fn done() -> Self {
        Self::new(true, 100.0, 100.0)
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0.0 {
            return 0.0;
        }
        self.completed / self.total * 100.0
    }
}

/// A status line split into what to show and how far along the run is.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatus {
    pub text: String,
    pub progress: Option<ProgressEvent>,
}

/// Parse a raw status line.
///
/// `"Generating output(3/10)"` becomes text `"Generating output"` with an
/// event of 30 out of 100. Lines without the pattern, or with a zero total,
/// come back verbatim and without an event.
pub fn parse_status(raw: &str) -> ParsedStatus {
    let matched = PROGRESS_RE.captures(raw).and_then(|caps| {
        let current: f64 = caps[2].parse().ok()?;
        let total: f64 = caps[3].parse().ok()?;
        if total == 0.0 {
            return None;
        }
        Some((caps[1].trim_end().to_string(), current / total * 100.0))
    });

    match matched {
        Some((text, percent)) => ParsedStatus {
            text,
            progress: Some(ProgressEvent::new(false, percent, 100.0)),
        },
        None => ParsedStatus {
            text: raw.to_string(),
            progress: None,
        },
    }
}
