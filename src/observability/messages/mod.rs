// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` so the log text lives in one place.
//! Messages that carry fields worth filtering on also implement
//! [`StructuredLog`], which emits the event with those fields attached at the
//! right level.
//!
//! # Organization
//!
//! * `flow` - compress, grayscale, extract and validate flows
//! * `vfs` - virtual filesystem staging and host synchronization
//! * `wasm` - module loading and execution
//! * `worker` - background compression worker
//!
//! # Usage Pattern
//!
//! ```rust
//! use pdfwasm::observability::messages::wasm::ModuleLoaded;
//!
//! let msg = ModuleLoaded {
//!     module_path: "assets/pdfcpu.wasm",
//!     size_bytes: 4096,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use std::fmt::{Display, Formatter};
use tracing::Span;

pub mod flow;
pub mod vfs;
pub mod wasm;
pub mod worker;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the event at the message's level.
    fn log(&self);

    /// A span carrying the same fields, for instrumenting the work the
    /// message describes. Messages that mark a finished event have none.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}

/// Renders an error followed by each of its sources, separated by `: `.
///
/// Error `Display` text never repeats its source, so logs use this to show
/// the whole cause.
pub struct ErrorChain<'a>(pub &'a dyn std::error::Error);

impl Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, ": {}", cause)?;
            source = cause.source();
        }
        Ok(())
    }
}
