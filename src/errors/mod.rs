// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod toolbox;

pub use config::ConfigError;
pub use toolbox::{ToolboxError, ToolboxResult};
