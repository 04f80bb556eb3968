// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging. Message types follow a struct-based pattern with a
//! `Display` implementation so log text is not scattered through the code.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::flow` - per-file flow lifecycle
//! * `messages::vfs` - virtual filesystem staging and host sync
//! * `messages::wasm` - module loading and execution
//! * `messages::worker` - background compression worker
//!
//! # Usage
//!
//! ```rust
//! use pdfwasm::observability::messages::flow::FlowFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = FlowFailed {
//!     flow: "grayscale",
//!     file: "report.pdf",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// Honors `RUST_LOG`; falls back to `default_directive` when it is unset.
/// Calling it twice is harmless, the second install is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
