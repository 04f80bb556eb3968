// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // WASI runtime (and test stubs)
pub mod commands;      // argv builders for gs and pdfcpu
pub mod config;        // config loading + validation
pub mod context;       // shared state for flows
pub mod errors;        // error handling
pub mod flows;         // compress, grayscale, extract, validate
pub mod observability;
pub mod packaging;     // artifacts and zips
pub mod progress;      // status line parsing
pub mod traits;        // executor and reporter seams
pub mod upload;
pub mod vfs;           // in-memory filesystem
pub mod worker;        // background compression
