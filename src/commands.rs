// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Argument vectors for the two binaries.
//!
//! The argument semantics belong to Ghostscript and pdfcpu; these builders
//! only fix the exact lists the flows rely on.

use crate::backends::wasm::{ExecutionRequest, ModuleRef};
use crate::errors::ToolboxError;
use std::fmt;
use std::str::FromStr;

/// Where the compression worker stages its input.
pub const GS_INPUT: &str = "input.pdf";
/// Where Ghostscript writes the compressed file.
pub const GS_OUTPUT: &str = "output.pdf";

/// Ghostscript pdfwrite at `/ebook` quality, PDF 1.4 output.
pub fn ghostscript_compress() -> ExecutionRequest {
    ExecutionRequest::new(
        ModuleRef::Ghostscript.program_name(),
        [
            "-sDEVICE=pdfwrite",
            "-dCompatibilityLevel=1.4",
            "-dPDFSETTINGS=/ebook",
            "-dNOPAUSE",
            "-dQUIET",
            "-dBATCH",
            "-sOutputFile=output.pdf",
            GS_INPUT,
        ],
    )
}

pub fn pdfcpu_validate(input: &str) -> ExecutionRequest {
    ExecutionRequest::new(
        ModuleRef::Pdfcpu.program_name(),
        ["validate", "-c", "disable", input],
    )
}

pub fn pdfcpu_grayscale(input: &str, output: &str) -> ExecutionRequest {
    ExecutionRequest::new(
        ModuleRef::Pdfcpu.program_name(),
        ["colorspace", "-mode", "grayscale", input, output],
    )
}

pub fn pdfcpu_extract(mode: ExtractMode, input: &str, output_dir: &str) -> ExecutionRequest {
    ExecutionRequest::new(
        ModuleRef::Pdfcpu.program_name(),
        ["extract", "-m", mode.as_str(), "-c", "disable", input, output_dir],
    )
}

/// The extraction modes the toolbox can read back.
///
/// pdfcpu knows more (`images`, `fonts`, `pages`); those are rejected when
/// parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Metadata,
    Content,
}

impl ExtractMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractMode::Metadata => "meta",
            ExtractMode::Content => "content",
        }
    }

    /// The file pdfcpu leaves in the output directory for this mode.
    pub fn output_file(self) -> &'static str {
        match self {
            ExtractMode::Metadata => "meta.json",
            ExtractMode::Content => "content.txt",
        }
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractMode {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meta" => Ok(ExtractMode::Metadata),
            "content" => Ok(ExtractMode::Content),
            other => Err(ToolboxError::UnsupportedMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghostscript_argument_list() {
        let request = ghostscript_compress();
        assert_eq!(request.program(), "gs");
        assert_eq!(
            request.args(),
            [
                "-sDEVICE=pdfwrite",
                "-dCompatibilityLevel=1.4",
                "-dPDFSETTINGS=/ebook",
                "-dNOPAUSE",
                "-dQUIET",
                "-dBATCH",
                "-sOutputFile=output.pdf",
                "input.pdf",
            ]
        );
    }

    #[test]
    fn test_pdfcpu_argument_lists() {
        assert_eq!(
            pdfcpu_validate("/a.pdf").args(),
            ["validate", "-c", "disable", "/a.pdf"]
        );
        assert_eq!(
            pdfcpu_grayscale("/a.pdf", "/a-grayscale.pdf").args(),
            ["colorspace", "-mode", "grayscale", "/a.pdf", "/a-grayscale.pdf"]
        );
        assert_eq!(
            pdfcpu_extract(ExtractMode::Content, "/a.pdf", "./extracted").args(),
            ["extract", "-m", "content", "-c", "disable", "/a.pdf", "./extracted"]
        );
    }

    #[test]
    fn test_extract_mode_parsing() {
        assert_eq!("meta".parse::<ExtractMode>().unwrap(), ExtractMode::Metadata);
        assert_eq!("content".parse::<ExtractMode>().unwrap(), ExtractMode::Content);

        for unsupported in ["images", "fonts", "pages", ""] {
            let err = unsupported.parse::<ExtractMode>().unwrap_err();
            assert!(matches!(err, ToolboxError::UnsupportedMode(ref m) if m == unsupported));
        }
    }
}
