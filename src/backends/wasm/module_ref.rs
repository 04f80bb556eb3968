// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// The WASM binaries the toolbox knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleRef {
    /// Ghostscript, used for compression.
    Ghostscript,
    /// pdfcpu, used for validation, grayscale conversion and extraction.
    Pdfcpu,
}

impl ModuleRef {
    pub const ALL: [ModuleRef; 2] = [ModuleRef::Ghostscript, ModuleRef::Pdfcpu];

    /// Name used in logs and config keys.
    pub fn name(self) -> &'static str {
        match self {
            ModuleRef::Ghostscript => "ghostscript",
            ModuleRef::Pdfcpu => "pdfcpu",
        }
    }

    /// `argv[0]` handed to the guest.
    pub fn program_name(self) -> &'static str {
        match self {
            ModuleRef::Ghostscript => "gs",
            ModuleRef::Pdfcpu => "pdfcpu",
        }
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
