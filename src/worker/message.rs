// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ToolboxError, ToolboxResult};
use crate::progress::ProgressEvent;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// What the compression worker posts back to its caller.
///
/// Status and progress may arrive any number of times. Exactly one of
/// `Completed` or `Failed` ends the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    Status { text: String },
    Progress { event: ProgressEvent },
    Completed { pdf_data_url: String },
    Failed { error: String },
}

impl WorkerMessage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerMessage::Completed { .. } | WorkerMessage::Failed { .. }
        )
    }
}

pub fn encode_data_url(bytes: &[u8]) -> String {
    format!("{}{}", PDF_DATA_URL_PREFIX, STANDARD.encode(bytes))
}

pub fn decode_data_url(url: &str) -> ToolboxResult<Vec<u8>> {
    let payload = url
        .strip_prefix(PDF_DATA_URL_PREFIX)
        .ok_or_else(|| ToolboxError::Worker("result is not a PDF data URL".to_string()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| ToolboxError::Worker(format!("result is not valid base64: {}", e)))
}
