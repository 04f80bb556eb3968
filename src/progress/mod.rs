// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Status line parsing and dispatch.

mod dispatcher;
mod parser;

pub use dispatcher::StatusDispatcher;
pub use parser::{parse_status, ParsedStatus, ProgressEvent};
