// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Virtual filesystem used to stage inputs for, and collect outputs from,
//! WASM modules.

mod bridge;
mod error;
mod memory;

pub use bridge::SyncSummary;
pub use error::{VfsError, VfsResult};
pub use memory::{normalize_path, VirtualFs, ROOT};
