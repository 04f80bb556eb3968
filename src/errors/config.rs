// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or checking a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither `.yaml`, `.yml` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Parsed fine but failed validation. One problem per line.
    #[error("Invalid configuration:\n{0}")]
    Invalid(String),
}
