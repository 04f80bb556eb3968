// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Background compression worker and its message protocol.

mod bridge;
mod message;

pub use bridge::CompressionWorker;
pub use message::{decode_data_url, encode_data_url, WorkerMessage};
